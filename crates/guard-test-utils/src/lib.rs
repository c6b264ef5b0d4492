//! # Guard Test Utilities
//!
//! Shared test utilities for the Gateway Access Guard.
//!
//! This crate provides:
//! - Deterministic key fixtures (fixed RSA pairs for reproducible tests)
//! - Test data builders (TestToken)
//! - Server test harness (TestGateway for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let gateway = TestGateway::spawn().await?;
//!
//!     let token = TestToken::new()
//!         .subject("alice")
//!         .claim("role", "ADMIN")
//!         .sign();
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/api/v1/reservas/10", gateway.url()))
//!         .bearer_auth(token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
