//! Feed query and aggregation service.
//!
//! Serves a user's feed: their own posts plus posts by users they hold a
//! friend edge towards, filtered by text and tags, newest first, paginated,
//! each post carrying its creator profile and full comment thread.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, FeedError, Result};
pub use services::{FeedService, FeedSettings};
