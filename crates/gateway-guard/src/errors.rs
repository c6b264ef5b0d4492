//! Gateway guard error types.
//!
//! Every rejection maps to one uniform external response. The reason is
//! logged server-side and recorded in metrics, but clients see the same
//! status, headers, and body whether the token was missing, malformed,
//! forged, or expired.

use crate::pipeline::RejectReason;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Guard error type.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The pipeline rejected the request. The reason stays internal.
    #[error("Unauthorized")]
    Unauthorized(RejectReason),
}

impl GuardError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            GuardError::Unauthorized(_) => 401,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GuardError::Unauthorized(reason) => {
                // Log the actual reason server-side; the client gets the
                // same generic response regardless of it.
                tracing::debug!(
                    target: "guard.errors",
                    reason = reason.as_str(),
                    "Returning unauthorized response"
                );
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"hotel-gateway\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}
