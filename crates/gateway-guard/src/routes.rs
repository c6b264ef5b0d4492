//! HTTP routes for the gateway guard service.
//!
//! Defines the Axum router and the layer stack around it.

use crate::handlers;
use crate::middleware::{enforce, http_metrics_middleware, GuardState};
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/actuator/health` - Liveness probe (`{"status":"UP"}`) - public by rule table
/// - `/actuator/metrics` - Prometheus metrics endpoint - public by rule table
/// - Guard middleware evaluating every request, matched or not
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
///
/// The guard wraps the whole router, so requests for paths with no route
/// still pass through access control before the 404 fallback. A protected
/// path without credentials is rejected with 401, never revealed as absent.
pub fn build_routes(guard_state: GuardState, metrics_handle: PrometheusHandle) -> Router {
    // Operational routes (public under the production rule table)
    let ops_routes = Router::new().route("/actuator/health", get(handlers::health_check));

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/actuator/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. Guard middleware - access decision (innermost, wraps routes and fallback)
    // 2. TraceLayer - Log request details
    // 3. TimeoutLayer - Timeout the request
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    ops_routes
        .merge(metrics_routes)
        .layer(middleware::from_fn_with_state(guard_state, enforce))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        // HTTP metrics layer (outermost) - captures ALL responses including
        // guard rejections and framework-level errors like 404, 405
        .layer(middleware::from_fn(http_metrics_middleware))
}
