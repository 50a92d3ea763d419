/// Post handlers - HTTP endpoints for creating posts
use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Rich text body
    #[validate(length(min = 2, max = 500))]
    pub post_in_html: String,
    #[validate(length(min = 1), custom(function = "validate_tags"))]
    pub tags: Vec<String>,
}

fn validate_tags(tags: &[String]) -> std::result::Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(ValidationError::new("empty_tag"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
    pub post_id: String,
    pub created_at: String,
}

/// Create a new post owned by the caller
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post_id = Uuid::new_v4().to_string();
    let created_at = post_repo::create_post(&pool, &post_id, &user_id.0, &req.post_in_html, &req.tags)
        .await
        .map_err(|e| {
            if foreign_key_violation(&e) {
                AppError::BadRequest("Unknown user".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(post_id = %post_id, user_id = %user_id.0, "post created");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "post created",
        "data": CreatedPost {
            post_id,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    })))
}

/// Whether `err` is a PostgreSQL foreign key violation (SQLSTATE 23503)
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23503")
        .unwrap_or(false)
}
