//! Prometheus metrics for the database connection pool
//!
//! Tracks pool size by state and connection acquisition failures.

use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};
use sqlx::PgPool;

lazy_static::lazy_static! {
    /// Database connection pool size by state (idle/active/max)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Pool-level errors by type (timeout/closed/other)
    static ref DB_POOL_ERRORS: IntCounterVec = register_int_counter_vec!(
        "db_pool_errors_total",
        "Database pool errors by type",
        &["service", "error_type"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Update connection pool gauges (called periodically by the pool task)
pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    let size = pool.size() as i64;
    let idle = pool.num_idle() as i64;

    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "idle"])
        .set(idle);
    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "active"])
        .set(size - idle);
    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "max"])
        .set(pool.options().get_max_connections() as i64);
}

/// Record a pool-level error. Non-pool errors are ignored.
pub fn record_pool_error(service: &str, err: &sqlx::Error) {
    let error_type = match err {
        sqlx::Error::PoolTimedOut => "timeout",
        sqlx::Error::PoolClosed => "closed",
        _ => return,
    };

    DB_POOL_ERRORS
        .with_label_values(&[service, error_type])
        .inc();
}
