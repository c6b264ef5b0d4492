//! Request-level metrics for every response the gateway produces.
//!
//! Rejections are deliberately opaque to callers, so these metrics are
//! where operators actually see them: a spike of 401s under one endpoint
//! label usually means a misconfigured client or a key mismatch. The layer
//! sits outermost so responses produced before any handler runs (guard
//! rejections and framework 404s/405s) are counted too.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Records count and duration for each completed request, labeled by
/// method, normalized endpoint, and status.
///
/// Paths collapse to their resource family inside [`record_http_request`]
/// so label cardinality stays bounded no matter what clients ask for.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}
