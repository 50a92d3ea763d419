use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Add a comment by `user_id` to a post. Returns the comment's creation
/// timestamp.
pub async fn create_comment(
    pool: &PgPool,
    post_id: &str,
    user_id: &str,
    comment: &str,
) -> Result<DateTime<Utc>, sqlx::Error> {
    let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        INSERT INTO comments (post_id, user_id, comment)
        VALUES ($1, $2, $3)
        RETURNING created_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(created_at)
}
