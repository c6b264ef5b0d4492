//! Health check handler.
//!
//! Provides the liveness endpoint for Kubernetes probes and load balancers.
//!
//! - `/actuator/health`: Liveness probe - returns UP if the process is running

use axum::Json;
use serde::Serialize;

/// Body of the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "UP" while the process is serving.
    pub status: &'static str,
}

/// Liveness probe handler.
///
/// Returns `{"status":"UP"}` to indicate the process is running.
/// Does NOT check any dependencies - failure means the process is hung/deadlocked.
///
/// Kubernetes will kill and restart the pod if this fails.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}
