//! Verified identity claims.
//!
//! Contains the claims extracted from verified JWTs. The `sub` field is
//! redacted in Debug output to prevent exposure in logs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Claim set of an accepted token.
///
/// Handlers receive this via request extensions after the guard forwards a
/// request; it is a read-only view of what the token asserted. The `sub`
/// field contains user identifiers which should not be exposed in logs, so
/// a custom Debug implementation redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier) - redacted in Debug output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration timestamp (Unix epoch seconds). Always present in an
    /// accepted token.
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not-before timestamp (Unix epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// All remaining claims (roles, issuer, anything upstream services put
    /// in the token). Preserved verbatim for downstream consumers.
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &self.sub.as_ref().map(|_| "[REDACTED]"))
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("custom_keys", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Claims {
    /// Look up a custom (non-registered) claim by name.
    pub fn custom(&self, name: &str) -> Option<&serde_json::Value> {
        self.custom.get(name)
    }
}
