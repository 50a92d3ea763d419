/// Configuration management for feed-service
///
/// Loaded from environment variables; a `.env` file is honoured when present.
/// Pool sizing and the database URL are read separately by
/// `db_pool::DbConfig::from_env`.
use anyhow::{bail, Context};
use db_pool::parse_env_with_default;
use serde::{Deserialize, Serialize};

use crate::services::feed::pagination::DEFAULT_PAGE_SIZE;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.env.eq_ignore_ascii_case("development")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret used to verify bearer tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

/// Feed query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size when the request does not give one
    pub default_page_size: u32,
    /// Largest page size the HTTP layer accepts
    pub max_page_size: u32,
    /// Deadline for the page and count queries together
    pub query_timeout_ms: u64,
}

const DEV_JWT_SECRET: &str = "dev-only-feed-service-secret";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_development = env.eq_ignore_ascii_case("development");

        let log_format = match std::env::var("LOG_FORMAT")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "" | "pretty" | "text" => LogFormat::Pretty,
            other => bail!("LOG_FORMAT must be 'json' or 'pretty', got '{}'", other),
        };

        let port = match std::env::var("APP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: '{}'", raw))?,
            Err(_) => 8080,
        };

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_development => DEV_JWT_SECRET.to_string(),
            _ => bail!("JWT_SECRET must be set outside development"),
        };

        let config = Config {
            app: AppConfig {
                env,
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                log_format,
            },
            database: DatabaseConfig {
                run_migrations: parse_env_with_default("RUN_MIGRATIONS", is_development),
            },
            auth: AuthConfig { jwt_secret },
            feed: FeedConfig {
                default_page_size: parse_env_with_default(
                    "FEED_DEFAULT_PAGE_SIZE",
                    DEFAULT_PAGE_SIZE,
                ),
                max_page_size: parse_env_with_default("FEED_MAX_PAGE_SIZE", 100),
                query_timeout_ms: parse_env_with_default("FEED_QUERY_TIMEOUT_MS", 5000),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.feed.default_page_size == 0 {
            bail!("FEED_DEFAULT_PAGE_SIZE must be greater than 0");
        }
        if self.feed.max_page_size < self.feed.default_page_size {
            bail!(
                "FEED_MAX_PAGE_SIZE ({}) must be at least FEED_DEFAULT_PAGE_SIZE ({})",
                self.feed.max_page_size,
                self.feed.default_page_size
            );
        }
        if self.feed.query_timeout_ms == 0 {
            bail!("FEED_QUERY_TIMEOUT_MS must be greater than 0");
        }
        Ok(())
    }
}
