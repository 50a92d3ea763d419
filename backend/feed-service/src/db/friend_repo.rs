use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::{Creator, Page};

/// Whether `user_id` holds a friend edge pointing at `friend_id`.
///
/// Edges are directed: this matches the row `(user_id, friend_id)` only.
pub async fn friend_edge_exists(
    pool: &PgPool,
    user_id: &str,
    friend_id: &str,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM friends WHERE user_id = $1 AND friend_id = $2)",
    )
    .bind(user_id)
    .bind(friend_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Outcome of a friend add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendChange {
    Applied,
    /// Add of an existing friendship, or remove of a missing one
    Unchanged,
    UnknownUser,
}

/// A friend as listed by `GET /v1/friend`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FriendRow {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub friend_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<FriendRow> for Creator {
    fn from(row: FriendRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            friend_count: i64::from(row.friend_count),
            created_at: row.created_at,
        }
    }
}

async fn refresh_friend_counts(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    friend_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET friend_count = (SELECT COUNT(*) FROM friends f WHERE f.user_id = users.id)
        WHERE id IN ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Make `user_id` and `friend_id` friends.
///
/// Writes the edge in both directions and refreshes both users'
/// `friend_count` in one transaction.
pub async fn add_friend(
    pool: &PgPool,
    user_id: &str,
    friend_id: &str,
) -> Result<FriendChange, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id IN ($1, $2)")
        .bind(user_id)
        .bind(friend_id)
        .fetch_one(&mut *tx)
        .await?;
    if known < 2 {
        return Ok(FriendChange::UnknownUser);
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO friends (user_id, friend_id)
        VALUES ($1, $2), ($2, $1)
        ON CONFLICT (user_id, friend_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Ok(FriendChange::Unchanged);
    }

    refresh_friend_counts(&mut tx, user_id, friend_id).await?;
    tx.commit().await?;

    Ok(FriendChange::Applied)
}

/// End the friendship between `user_id` and `friend_id`, removing both
/// edge directions and refreshing both counts in one transaction.
pub async fn remove_friend(
    pool: &PgPool,
    user_id: &str,
    friend_id: &str,
) -> Result<FriendChange, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let known = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(friend_id)
        .fetch_one(&mut *tx)
        .await?;
    if !known {
        return Ok(FriendChange::UnknownUser);
    }

    let deleted = sqlx::query(
        r#"
        DELETE FROM friends
        WHERE (user_id = $1 AND friend_id = $2)
           OR (user_id = $2 AND friend_id = $1)
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Ok(FriendChange::Unchanged);
    }

    refresh_friend_counts(&mut tx, user_id, friend_id).await?;
    tx.commit().await?;

    Ok(FriendChange::Applied)
}

/// One page of `user_id`'s friends, most recently added first, plus the
/// total number of friends.
pub async fn list_friends(
    pool: &PgPool,
    user_id: &str,
    page: Page,
) -> Result<(Vec<FriendRow>, i64), sqlx::Error> {
    let rows = sqlx::query_as::<_, FriendRow>(
        r#"
        SELECT u.id, u.name, u.image_url, u.friend_count, u.created_at
        FROM friends f
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC, u.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool);

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friends WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool);

    tokio::try_join!(rows, total)
}
