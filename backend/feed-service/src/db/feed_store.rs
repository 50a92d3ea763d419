//! Feed read path against PostgreSQL.
//!
//! One statement returns the page: posts joined to their owner, newest
//! first, each row carrying its comments aggregated into a JSON array of
//! 7-element tuples. A second statement counts every post matching the same
//! predicate, ignoring the window.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::FeedError;
use crate::models::Page;
use crate::services::feed::predicate::FeedPredicate;

const PAGE_SELECT: &str = r#"
SELECT p.id, p.user_id, p.content, p.tags, p.created_at,
       u.name AS creator_name,
       u.image_url AS creator_image_url,
       u.friend_count AS creator_friend_count,
       u.created_at AS creator_created_at,
       COALESCE((
           SELECT json_agg(
                      json_build_array(
                          c.comment, c.created_at, cu.id, cu.name,
                          cu.image_url, cu.friend_count, cu.created_at
                      )
                      ORDER BY c.created_at ASC, c.id ASC
                  )
           FROM comments c
           JOIN users cu ON cu.id = c.user_id
           WHERE c.post_id = p.id
       ), '[]'::json) AS comments
FROM posts p
JOIN users u ON u.id = p.user_id
WHERE "#;

const COUNT_SELECT: &str = "SELECT COUNT(*) FROM posts p WHERE ";

/// Predicate plus row window for one feed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub predicate: FeedPredicate,
    pub page: Page,
}

/// Raw page row; `comments` is still the aggregated JSON payload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub creator_name: String,
    pub creator_image_url: Option<String>,
    pub creator_friend_count: i32,
    pub creator_created_at: DateTime<Utc>,
    pub comments: serde_json::Value,
}

/// Read capability the feed engine needs from its store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Fetch one window of matching posts, newest first.
    async fn fetch_page(&self, query: &FeedQuery) -> Result<Vec<FeedRow>, FeedError>;

    /// Count every post matching `predicate`, ignoring pagination.
    async fn count_matching(&self, predicate: &FeedPredicate) -> Result<i64, FeedError>;
}

pub(crate) fn build_page_query(query: &FeedQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PAGE_SELECT);
    query.predicate.push_sql(&mut qb);
    qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
    qb.push_bind(query.page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(query.page.offset);
    qb
}

pub(crate) fn build_count_query(predicate: &FeedPredicate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(COUNT_SELECT);
    predicate.push_sql(&mut qb);
    qb
}

#[derive(Clone)]
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    #[tracing::instrument(skip_all, name = "db.feed.fetch_page", fields(limit = query.page.limit, offset = query.page.offset))]
    async fn fetch_page(&self, query: &FeedQuery) -> Result<Vec<FeedRow>, FeedError> {
        let mut qb = build_page_query(query);
        let rows = qb
            .build_query_as::<FeedRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                db_pool::record_pool_error("feed-service", &e);
                FeedError::from(e)
            })?;

        Ok(rows)
    }

    #[tracing::instrument(skip_all, name = "db.feed.count_matching")]
    async fn count_matching(&self, predicate: &FeedPredicate) -> Result<i64, FeedError> {
        let mut qb = build_count_query(predicate);
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                db_pool::record_pool_error("feed-service", &e);
                FeedError::from(e)
            })?;

        Ok(total)
    }
}
