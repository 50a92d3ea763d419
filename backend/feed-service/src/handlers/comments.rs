/// Comment handlers - HTTP endpoints for commenting on posts
use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::posts::foreign_key_violation;
use crate::db::{comment_repo, friend_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::UserId;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub post_id: String,
    #[validate(length(min = 2, max = 500))]
    pub comment: String,
}

/// Comment on a post. Allowed for the post owner and for callers holding a
/// friend edge towards the owner, the same rule the feed uses for visibility.
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = post_repo::find_post_owner(&pool, &req.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", req.post_id)))?;

    if post.user_id != user_id.0
        && !friend_repo::friend_edge_exists(&pool, &user_id.0, &post.user_id).await?
    {
        return Err(AppError::BadRequest(
            "You can only comment on your own posts or posts by your friends".to_string(),
        ));
    }

    let created_at = comment_repo::create_comment(&pool, &post.id, &user_id.0, &req.comment)
        .await
        .map_err(|e| {
            if foreign_key_violation(&e) {
                AppError::BadRequest("Unknown user".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(post_id = %post.id, user_id = %user_id.0, "comment created");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "comment created",
        "data": {
            "postId": post.id,
            "createdAt": created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    })))
}
