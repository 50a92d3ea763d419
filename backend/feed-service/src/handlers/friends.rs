/// Friend handlers - HTTP endpoints for managing and listing friends
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::feed::parse_count;
use crate::config::FeedConfig;
use crate::db::friend_repo::{self, FriendChange};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::views::FriendListResponse;
use crate::models::Creator;
use crate::services::feed::pagination;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

impl FriendRequest {
    fn target_for(&self, caller: &UserId) -> Result<&str> {
        self.validate()?;
        if self.user_id == caller.0 {
            return Err(AppError::BadRequest(
                "You cannot add or remove yourself as a friend".to_string(),
            ));
        }
        Ok(&self.user_id)
    }
}

/// Add a friend. The friendship is mutual.
pub async fn add_friend(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<FriendRequest>,
) -> Result<HttpResponse> {
    let friend_id = req.target_for(&user_id)?;

    match friend_repo::add_friend(&pool, &user_id.0, friend_id).await? {
        FriendChange::Applied => {
            tracing::info!(user_id = %user_id.0, friend_id = %friend_id, "friend added");
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "friend added" })))
        }
        FriendChange::Unchanged => Err(AppError::BadRequest(format!(
            "Already friends with {}",
            friend_id
        ))),
        FriendChange::UnknownUser => Err(AppError::NotFound(format!("user {}", friend_id))),
    }
}

/// Remove a friend, dropping the friendship in both directions.
pub async fn remove_friend(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<FriendRequest>,
) -> Result<HttpResponse> {
    let friend_id = req.target_for(&user_id)?;

    match friend_repo::remove_friend(&pool, &user_id.0, friend_id).await? {
        FriendChange::Applied => {
            tracing::info!(user_id = %user_id.0, friend_id = %friend_id, "friend removed");
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "friend removed" })))
        }
        FriendChange::Unchanged => {
            Err(AppError::BadRequest(format!("Not friends with {}", friend_id)))
        }
        FriendChange::UnknownUser => Err(AppError::NotFound(format!("user {}", friend_id))),
    }
}

/// List the caller's friends. `offset` is a page index, as on `GET /v1/post`.
pub async fn list_friends(
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
    user_id: UserId,
    feed: web::Data<FeedConfig>,
) -> Result<HttpResponse> {
    let mut limit = None;
    let mut index = None;
    for (key, value) in query.into_inner() {
        match key.as_str() {
            "limit" => limit = parse_count("limit", &value)?,
            "offset" => index = parse_count("offset", &value)?,
            _ => {}
        }
    }

    let limit = limit.unwrap_or(0);
    if limit > feed.max_page_size {
        return Err(AppError::BadRequest(format!(
            "limit must not exceed {}",
            feed.max_page_size
        )));
    }
    let page = pagination::resolve(limit, index.unwrap_or(0), feed.default_page_size);

    let (rows, total) = friend_repo::list_friends(&pool, &user_id.0, page).await?;
    let friends = rows.into_iter().map(Creator::from).collect();

    Ok(HttpResponse::Ok().json(FriendListResponse::new(friends, total, page)))
}
