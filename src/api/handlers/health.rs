//! Health check endpoint

use std::sync::OnceLock;
use std::time::Instant;

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Called once during router setup.
pub fn mark_started() {
    STARTED_AT.get_or_init(Instant::now);
}

/// Service status
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the service is running normally
    pub status: String,
    /// Crate version (from Cargo.toml)
    pub version: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
}

/// Service health check
///
/// Returns the current status, version and uptime.
/// Useful for availability monitoring; no request body or parameters.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running normally", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    let uptime = STARTED_AT
        .get()
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}
