//! JSON response bodies for the `/v1/post` and `/v1/friend` endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{Comment, Creator, FeedPost, FeedResult, Page};

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorView {
    pub user_id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub friend_count: i64,
    pub created_at: String,
}

impl From<Creator> for CreatorView {
    fn from(creator: Creator) -> Self {
        Self {
            created_at: format_timestamp(&creator.created_at),
            user_id: creator.id,
            name: creator.name,
            image_url: creator.image_url,
            friend_count: creator.friend_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBodyView {
    pub post_in_html: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment: String,
    pub created_at: String,
    pub creator: CreatorView,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            created_at: format_timestamp(&comment.created_at),
            comment: comment.text,
            creator: comment.creator.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub post_id: String,
    pub post: PostBodyView,
    pub comments: Vec<CommentView>,
    pub creator: CreatorView,
}

impl From<FeedPost> for PostView {
    fn from(item: FeedPost) -> Self {
        Self {
            post_id: item.post.id,
            post: PostBodyView {
                created_at: format_timestamp(&item.post.created_at),
                post_in_html: item.post.content,
                tags: item.post.tags,
            },
            comments: item.comments.into_iter().map(CommentView::from).collect(),
            creator: item.creator.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

/// `GET /v1/post` response body
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub message: String,
    pub data: Vec<PostView>,
    pub meta: Meta,
}

impl From<FeedResult> for FeedResponse {
    fn from(result: FeedResult) -> Self {
        Self {
            message: "ok".to_string(),
            meta: Meta {
                limit: result.page.limit,
                offset: result.page.offset,
                total: result.total,
            },
            data: result.posts.into_iter().map(PostView::from).collect(),
        }
    }
}

/// `GET /v1/friend` response body
#[derive(Debug, Clone, Serialize)]
pub struct FriendListResponse {
    pub message: String,
    pub data: Vec<CreatorView>,
    pub meta: Meta,
}

impl FriendListResponse {
    pub fn new(friends: Vec<Creator>, total: i64, page: Page) -> Self {
        Self {
            message: "ok".to_string(),
            data: friends.into_iter().map(CreatorView::from).collect(),
            meta: Meta {
                limit: page.limit,
                offset: page.offset,
                total,
            },
        }
    }
}
