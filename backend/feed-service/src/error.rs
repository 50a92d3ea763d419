/// Error types for feed-service
///
/// `FeedError` is the engine's taxonomy; `AppError` is what HTTP handlers
/// return and is rendered as a JSON error body.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for handler-level operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures surfaced by the feed engine.
///
/// An empty feed is not an error: it is a successful result with a zero total.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Store unreachable, query failed or the request deadline elapsed.
    #[error("Transient store failure: {0}")]
    Transient(String),

    /// Rows or the aggregated comment payload did not match the expected shape.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
}

impl FeedError {
    /// Label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transient(_) => "transient",
            FeedError::DataIntegrity(_) => "data_integrity",
        }
    }
}

impl From<sqlx::Error> for FeedError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => FeedError::DataIntegrity(err.to_string()),
            other => FeedError::Transient(other.to_string()),
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message exposed to clients. Store and integrity details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Feed(FeedError::Transient(_)) => {
                "Feed is temporarily unavailable, please retry".to_string()
            }
            AppError::Feed(FeedError::DataIntegrity(_))
            | AppError::Database(_)
            | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Feed(FeedError::Transient(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Feed(FeedError::DataIntegrity(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
