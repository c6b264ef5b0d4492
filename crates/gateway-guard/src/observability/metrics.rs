//! Metrics definitions for the gateway guard.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gateway_guard_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: resource families plus `/other` (~12 values)
//! - `outcome`: 2 values (forwarded, rejected)
//! - `reason`: bounded by rejection reason variants plus `public_route`/`verified`
//! - `result`: bounded by verifier error classes plus `ok`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_guard_http_request".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Guard Decision Metrics
// ============================================================================

/// Record a guard decision for an incoming request.
///
/// Metric: `gateway_guard_decisions_total`
/// Labels: `outcome`, `reason`
///
/// Outcomes: "forwarded", "rejected"
/// Reasons for forwarded: "public_route", "verified"
/// Reasons for rejected: "missing_credentials", "malformed_token",
///                       "invalid_signature", "token_expired", "token_not_yet_valid"
pub fn record_guard_decision(outcome: &str, reason: &str) {
    counter!("gateway_guard_decisions_total",
        "outcome" => outcome.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Token Validation Metrics
// ============================================================================

/// Record a token verification attempt.
///
/// Metric: `gateway_guard_token_validations_total`
/// Labels: `result`
///
/// Results: "ok", "malformed", "invalid_signature", "expired", "not_yet_valid"
pub fn record_token_validation(result: &str) {
    counter!("gateway_guard_token_validations_total",
        "result" => result.to_string()
    )
    .increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `gateway_guard_http_requests_total`, `gateway_guard_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// This captures ALL HTTP responses including guard rejections (401) and
/// framework-level errors like 404 Not Found and 405 Method Not Allowed.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    // Normalize endpoint to prevent cardinality explosion
    let normalized_endpoint = normalize_endpoint(endpoint);

    // Determine status category for simplified querying
    let status = categorize_status_code(status_code);

    histogram!("gateway_guard_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("gateway_guard_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Resource families the gateway routes for. Paths under these are
/// collapsed to a single endpoint label per family.
const API_RESOURCES: [&str; 8] = [
    "auth",
    "oauth",
    "contacto",
    "actuator",
    "hoteles",
    "departamentos",
    "habitaciones",
    "tipos-habitacion",
];

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Collapses resource IDs and sub-paths into a per-family placeholder.
fn normalize_endpoint(path: &str) -> String {
    // Known static paths
    match path {
        "/" => "/".to_string(),
        "/actuator/health" => "/actuator/health".to_string(),
        "/actuator/metrics" => "/actuator/metrics".to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Normalize API paths to their resource family
///
/// e.g. `/api/v1/hoteles/5/habitaciones` becomes `/api/v1/hoteles/**`.
fn normalize_dynamic_endpoint(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("/api/v1/") {
        if let Some(resource) = rest.split('/').next() {
            if API_RESOURCES.contains(&resource) {
                return format!("/api/v1/{resource}/**");
            }
        }
    }

    // Unknown paths normalized to "/other" to bound cardinality
    "/other".to_string()
}

// ============================================================================
// Tests
// ============================================================================
