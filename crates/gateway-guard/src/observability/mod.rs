//! Observability module for the gateway guard.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
