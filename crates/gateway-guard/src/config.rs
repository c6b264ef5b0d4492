//! Gateway guard configuration.
//!
//! Configuration is loaded from environment variables. Key material is
//! redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default JWT clock skew tolerance in seconds.
///
/// Zero means strict expiry: a token is rejected from the exact second
/// its `exp` claim names.
pub const DEFAULT_JWT_CLOCK_SKEW_SECONDS: u32 = 0;

/// Maximum permitted JWT clock skew tolerance in seconds.
pub const MAX_JWT_CLOCK_SKEW_SECONDS: u32 = 600;

/// Gateway guard configuration.
///
/// Loaded from environment variables with sensible defaults. The public
/// key PEM is redacted in Debug output to keep key material out of logs.
#[derive(Clone)]
pub struct Config {
    /// RSA public key PEM used to verify access tokens.
    ///
    /// Accepted as delivered by the deployment environment, which may
    /// mangle newlines; sanitation happens in `keys::VerificationKey`.
    pub public_key_pem: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// JWT clock skew tolerance in seconds for token validation.
    pub jwt_clock_skew_seconds: u32,
}

/// Custom Debug implementation that redacts key material.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("public_key_pem", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("jwt_clock_skew_seconds", &self.jwt_clock_skew_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidClockSkew(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let public_key_pem = vars
            .get("JWT_PUBLIC_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_PUBLIC_KEY".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse JWT clock skew tolerance with validation
        let jwt_clock_skew_seconds = if let Some(value_str) = vars.get("JWT_CLOCK_SKEW_SECONDS") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value > MAX_JWT_CLOCK_SKEW_SECONDS {
                return Err(ConfigError::InvalidClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must not exceed {} seconds, got {}",
                    MAX_JWT_CLOCK_SKEW_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_JWT_CLOCK_SKEW_SECONDS
        };

        Ok(Config {
            public_key_pem,
            bind_address,
            jwt_clock_skew_seconds,
        })
    }
}
