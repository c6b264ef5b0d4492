//! Prometheus metrics endpoint handler.
//!
//! Provides `/actuator/metrics` for Prometheus scraping.
//!
//! # Security
//!
//! This endpoint is unauthenticated to allow Prometheus to scrape metrics.
//! No PII or secrets are exposed in metrics. Only operational data with
//! bounded cardinality labels.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /actuator/metrics
///
/// Returns Prometheus-formatted metrics for scraping.
///
/// # Response
///
/// Returns 200 OK with Prometheus text format:
/// ```text
/// # HELP gateway_guard_decisions_total Total guard decisions
/// # TYPE gateway_guard_decisions_total counter
/// gateway_guard_decisions_total{outcome="forwarded",reason="public_route"} 42
/// ```
#[tracing::instrument(skip_all, name = "guard.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
