//! Service layer for feed-service

pub mod feed;

pub use feed::{FeedService, FeedSettings};
