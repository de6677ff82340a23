use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use tracing::error;

use crate::db::connection::Probe;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Ping the store and answer 200 with `up`, or 503 with `down` plus the cause
async fn probe_response(probe: &dyn Probe, up: &'static str, down: &'static str) -> HttpResponse {
    match probe.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} check failed: database unavailable: {:?}", down, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(probe: web::Data<dyn Probe>) -> impl Responder {
    probe_response(probe.get_ref(), "healthy", "unhealthy").await
}

/// Ready to accept traffic; 503 while the database is unreachable
#[get("/ready")]
async fn readiness_check(probe: web::Data<dyn Probe>) -> impl Responder {
    probe_response(probe.get_ref(), "ready", "not_ready").await
}

/// Process is alive. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
