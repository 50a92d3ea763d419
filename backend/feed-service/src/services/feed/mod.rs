//! Feed query engine.
//!
//! Composes visibility and filter predicates, resolves the page window, and
//! runs the page query and the total count concurrently against a
//! [`FeedStore`]. Both queries share one predicate value, so the total always
//! counts exactly the posts the page is drawn from.

pub mod decode;
pub mod filters;
pub mod pagination;
pub mod predicate;
pub mod visibility;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::config::FeedConfig;
use crate::db::feed_store::{FeedQuery, FeedStore};
use crate::error::FeedError;
use crate::metrics::feed::{observe_request, FEED_DATA_INTEGRITY_ERRORS, FEED_POSTS_RETURNED};
use crate::models::{FeedFilter, FeedResult};

/// Engine knobs taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub default_page_size: u32,
    /// Deadline covering both the page and the count query.
    pub query_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            default_page_size: pagination::DEFAULT_PAGE_SIZE,
            query_timeout: Duration::from_millis(5000),
        }
    }
}

impl From<&FeedConfig> for FeedSettings {
    fn from(config: &FeedConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            query_timeout: Duration::from_millis(config.query_timeout_ms),
        }
    }
}

#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn FeedStore>,
    settings: FeedSettings,
}

impl FeedService {
    pub fn new(store: Arc<dyn FeedStore>, settings: FeedSettings) -> Self {
        Self { store, settings }
    }

    /// Return one page of the posts `user_id` may see, newest first, with
    /// the total number of matching posts.
    ///
    /// Read-only. An empty page is a success with `total = 0`; when the page
    /// index runs past the end, `posts` is empty but `total` still reports
    /// every match.
    #[tracing::instrument(
        skip(self, filter),
        fields(page_size = filter.page_size, page_index = filter.page_index)
    )]
    pub async fn get_feed(
        &self,
        user_id: &str,
        filter: &FeedFilter,
    ) -> Result<FeedResult, FeedError> {
        let started = Instant::now();
        let result = self.run_query(user_id, filter).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(feed) => {
                observe_request("ok", elapsed);
                FEED_POSTS_RETURNED.observe(feed.posts.len() as f64);
                debug!(
                    posts = feed.posts.len(),
                    total = feed.total,
                    "feed page served"
                );
            }
            Err(err @ FeedError::DataIntegrity(_)) => {
                observe_request(err.kind(), elapsed);
                FEED_DATA_INTEGRITY_ERRORS.inc();
                error!(error = %err, "feed data failed integrity checks");
            }
            Err(err @ FeedError::Transient(_)) => {
                observe_request(err.kind(), elapsed);
                warn!(error = %err, "feed query failed");
            }
        }

        result
    }

    async fn run_query(&self, user_id: &str, filter: &FeedFilter) -> Result<FeedResult, FeedError> {
        let predicate = filters::compose(visibility::visible_to(user_id), filter);
        let page = pagination::resolve(
            filter.page_size,
            filter.page_index,
            self.settings.default_page_size,
        );
        let query = FeedQuery { predicate, page };

        let (rows, total) = tokio::time::timeout(self.settings.query_timeout, async {
            tokio::try_join!(
                self.store.fetch_page(&query),
                self.store.count_matching(&query.predicate)
            )
        })
        .await
        .map_err(|_| {
            FeedError::Transient(format!(
                "feed query exceeded {}ms deadline",
                self.settings.query_timeout.as_millis()
            ))
        })??;

        if rows.is_empty() && total == 0 {
            return Ok(FeedResult::empty(page));
        }

        let posts = rows
            .into_iter()
            .map(decode::decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedResult { posts, total, page })
    }
}
