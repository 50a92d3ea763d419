use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// A stored post and the user who owns it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostOwner {
    pub id: String,
    pub user_id: String,
}

/// Insert a new post owned by `user_id`. Returns its creation timestamp.
pub async fn create_post(
    pool: &PgPool,
    post_id: &str,
    user_id: &str,
    content: &str,
    tags: &[String],
) -> Result<DateTime<Utc>, sqlx::Error> {
    let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        INSERT INTO posts (id, user_id, content, tags)
        VALUES ($1, $2, $3, $4)
        RETURNING created_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .bind(tags)
    .fetch_one(pool)
    .await?;

    Ok(created_at)
}

/// Find a post's owner by post ID
pub async fn find_post_owner(
    pool: &PgPool,
    post_id: &str,
) -> Result<Option<PostOwner>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostOwner>(
        r#"
        SELECT id, user_id
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}
