//! HTTP request handlers for the gateway guard's own operational endpoints.

pub mod health;
pub mod metrics;

pub use health::health_check;
pub use metrics::metrics_handler;
