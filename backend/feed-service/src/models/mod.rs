/// Data models for feed-service
///
/// Domain records produced by the feed engine. The JSON shapes returned by
/// the HTTP layer live in [`views`].
pub mod views;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile summary used for both post authors and comment authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub friend_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub owner_id: String,
    /// Rich text (HTML) body
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub creator: Creator,
}

/// A post as it appears in a feed: creator profile plus its full comment
/// thread, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub post: Post,
    pub creator: Creator,
    pub comments: Vec<Comment>,
}

/// Caller-supplied feed filter.
///
/// Empty `search` and empty `tags` mean "no filter"; a `page_size` of 0
/// selects the configured default page size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub page_size: u32,
    pub page_index: u32,
}

impl FeedFilter {
    /// Search text, if any non-empty text was supplied
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// Resolved row window for a feed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// One page of a user's feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResult {
    /// Most recent first
    pub posts: Vec<FeedPost>,
    /// Number of posts matching the filter before pagination
    pub total: i64,
    pub page: Page,
}

impl FeedResult {
    pub fn empty(page: Page) -> Self {
        Self {
            posts: Vec::new(),
            total: 0,
            page,
        }
    }
}
