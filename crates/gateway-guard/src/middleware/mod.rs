//! Middleware for the gateway guard.
//!
//! # Components
//!
//! - `guard` - Access-guard enforcement middleware wrapping the pipeline
//! - `http_metrics` - HTTP request metrics middleware

pub mod guard;
pub mod http_metrics;

pub use guard::{enforce, ClaimsExt, GuardState};
pub use http_metrics::http_metrics_middleware;
