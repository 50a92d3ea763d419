/// Database access layer
///
/// - `feed_store`: the feed read path behind the [`FeedStore`] trait
/// - `post_repo`, `comment_repo`, `friend_repo`: write path and lookups used
///   by the post and comment handlers
pub mod comment_repo;
pub mod feed_store;
pub mod friend_repo;
pub mod post_repo;

pub use feed_store::{FeedQuery, FeedRow, FeedStore, PgFeedStore};
