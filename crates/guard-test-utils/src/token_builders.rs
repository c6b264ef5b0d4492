//! Builder patterns for test data construction
//!
//! Provides a fluent API for creating signed test JWTs.

use crate::fixtures::PRIMARY_PRIVATE_KEY_PEM;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};

/// Builder for creating signed test tokens
///
/// Defaults to a token for subject `test-user` expiring one hour from
/// now, signed with the primary test key.
///
/// # Example
/// ```rust,ignore
/// let token = TestToken::new()
///     .subject("alice")
///     .claim("role", "ADMIN")
///     .sign();
/// ```
pub struct TestToken {
    claims: Map<String, Value>,
}

impl TestToken {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        let mut claims = Map::new();
        claims.insert("sub".to_string(), Value::from("test-user"));
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(now + 3600));
        Self { claims }
    }

    /// Set the subject claim
    pub fn subject(mut self, subject: &str) -> Self {
        self.claims.insert("sub".to_string(), Value::from(subject));
        self
    }

    /// Set an arbitrary claim
    pub fn claim(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.claims.insert(name.to_string(), value.into());
        self
    }

    /// Make the token long expired (one hour ago)
    pub fn expired(self) -> Self {
        self.expires_in(-3600)
    }

    /// Set expiration relative to now; negative values lie in the past
    pub fn expires_in(mut self, seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        self.claims
            .insert("exp".to_string(), Value::from(now + seconds));
        self
    }

    /// Set the exact expiration timestamp
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.claims.insert("exp".to_string(), Value::from(timestamp));
        self
    }

    /// Set a not-before claim relative to now
    pub fn not_before_in(mut self, seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        self.claims
            .insert("nbf".to_string(), Value::from(now + seconds));
        self
    }

    /// Drop the expiration claim entirely (structurally invalid for the guard)
    pub fn without_expiry(mut self) -> Self {
        self.claims.remove("exp");
        self
    }

    /// Sign with the primary test key
    pub fn sign(self) -> String {
        self.sign_with(PRIMARY_PRIVATE_KEY_PEM)
    }

    /// Sign with an arbitrary RSA private key PEM
    pub fn sign_with(self, private_key_pem: &str) -> String {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .expect("test private key should parse");
        encode(&Header::new(Algorithm::RS256), &self.claims, &key)
            .expect("signing test token should succeed")
    }
}

impl Default for TestToken {
    fn default() -> Self {
        Self::new()
    }
}
