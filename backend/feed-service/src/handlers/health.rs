/// Liveness and readiness endpoints
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    postgres: String,
    latency_ms: u64,
    timestamp: String,
}

pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "feed-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = sqlx::query("SELECT 1").execute(pool.get_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (ready, postgres) = match result {
        Ok(_) => (true, "healthy".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (false, format!("unhealthy: {}", e))
        }
    };

    let response = ReadinessResponse {
        ready,
        postgres,
        latency_ms,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
