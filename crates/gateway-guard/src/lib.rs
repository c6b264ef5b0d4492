//! Gateway Access Guard Library
//!
//! This library provides the access-control layer of the hotel platform's
//! API gateway. Every inbound request passes through it before reaching an
//! upstream handler:
//!
//! - RSA public key loading, tolerant of environment-mangled PEM
//! - Bearer token verification (RS256 signature, expiry, not-before)
//! - Route authorization from an ordered table of path glob rules
//! - A uniform 401 response that never reveals why a request was rejected
//!
//! # Architecture
//!
//! Requests flow through an explicit interceptor pipeline assembled at
//! startup:
//!
//! ```text
//! routes.rs -> middleware/guard.rs -> pipeline.rs -> guard.rs
//!                                                      |- rules.rs
//!                                                      |- verifier.rs -> keys.rs
//! ```
//!
//! # Modules
//!
//! - `claims` - Verified token claims handed to upstream handlers
//! - `config` - Service configuration from environment
//! - `errors` - The uniform external rejection response
//! - `guard` - The access-guard pipeline stage (rules + verifier)
//! - `handlers` - Operational HTTP endpoints (health, metrics)
//! - `keys` - PEM sanitation and verification key loading
//! - `middleware` - Axum integration and HTTP metrics
//! - `observability` - Metrics definitions
//! - `pipeline` - Interceptor trait, verdicts, request context
//! - `routes` - Axum router setup
//! - `rules` - Path glob rules and the ordered rule table
//! - `verifier` - Token verification against the loaded key

pub mod claims;
pub mod config;
pub mod errors;
pub mod guard;
pub mod handlers;
pub mod keys;
pub mod middleware;
pub mod observability;
pub mod pipeline;
pub mod routes;
pub mod rules;
pub mod verifier;
