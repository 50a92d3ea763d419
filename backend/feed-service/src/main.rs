use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_service::config::{Config, LogFormat};
use feed_service::db::PgFeedStore;
use feed_service::handlers::{self, FeedHandlerState};
use feed_service::middleware::JwtAuthMiddleware;
use feed_service::services::{FeedService, FeedSettings};

fn init_tracing(format: &LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app.log_format);

    info!("Starting feed-service v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);

    let mut db_cfg = DbConfig::from_env("feed-service").map_err(anyhow::Error::msg)?;
    if db_cfg.statement_timeout_ms == 0 {
        db_cfg.statement_timeout_ms = config.feed.query_timeout_ms;
    }
    db_cfg.log_config();

    let pool = create_pool(db_cfg)
        .await
        .context("Failed to create database pool")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
    }

    let store = Arc::new(PgFeedStore::new(pool.clone()));
    let feed = Arc::new(FeedService::new(store, FeedSettings::from(&config.feed)));
    let feed_state = web::Data::new(FeedHandlerState {
        feed,
        max_page_size: config.feed.max_page_size,
    });
    let pool_data = web::Data::new(pool.clone());
    let feed_config = web::Data::new(config.feed.clone());
    let auth = JwtAuthMiddleware::new(&config.auth.jwt_secret);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(feed_state.clone())
            .app_data(pool_data.clone())
            .app_data(feed_config.clone())
            .configure(|cfg| handlers::configure(cfg, auth.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .shutdown_timeout(5)
    .run()
    .await
    .context("HTTP server error")?;

    info!("feed-service shutting down");
    pool.close().await;

    Ok(())
}
