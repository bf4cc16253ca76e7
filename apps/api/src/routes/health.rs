use axum::Json;
use serde::Serialize;

const SERVICE_NAME: &str = "ranking-api";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// GET /health
/// Liveness only; the engine has no dependencies to check.
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE_NAME,
    })
}
