//! JWT verification against the gateway's RSA public key.
//!
//! Checks are strictly ordered: structure, then signature, then expiry, then
//! not-before. A token that fails an early check never reports a later
//! failure class, so a response (or log line) for a malformed token cannot
//! be confused with one for a tampered token.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only RS256 is accepted; no algorithm negotiation with the caller
//! - All error variants share one generic display message so formatting an
//!   error into a response cannot leak the failure class
//! - Expiry and not-before use an explicit `now` so boundary behavior is
//!   deterministic and testable

use crate::claims::Claims;
use crate::keys::VerificationKey;
use crate::observability::metrics;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::instrument;

/// Maximum allowed token size in bytes (8KB).
///
/// Typical tokens are 200-800 bytes. Anything larger is rejected before
/// base64 decoding or signature verification runs, bounding the work an
/// unauthenticated caller can trigger.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Token verification failures, in check order.
///
/// Display output is intentionally identical across variants; the variant
/// itself feeds internal logs and metrics via [`VerifyError::as_str`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// Not a parseable JWS: wrong segment count, undecodable header or
    /// claims, unsupported algorithm, missing `exp`, or oversized input.
    #[error("The access token is invalid or expired")]
    Malformed,

    /// Signature does not verify against the configured public key.
    #[error("The access token is invalid or expired")]
    InvalidSignature,

    /// `exp` is in the past.
    #[error("The access token is invalid or expired")]
    Expired,

    /// `nbf` is present and in the future.
    #[error("The access token is invalid or expired")]
    NotYetValid,
}

impl VerifyError {
    /// Stable label for logs and metrics. Never shown to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyError::Malformed => "malformed",
            VerifyError::InvalidSignature => "invalid_signature",
            VerifyError::Expired => "expired",
            VerifyError::NotYetValid => "not_yet_valid",
        }
    }
}

/// Verifies bearer tokens against a fixed RSA public key.
///
/// Built once at startup from the loaded [`VerificationKey`] and shared
/// behind the pipeline; verification itself is pure and lock-free.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    clock_skew_seconds: u32,
}

impl TokenVerifier {
    /// Build a verifier from the loaded key.
    ///
    /// `clock_skew_seconds` is the tolerance applied to `exp` and `nbf`
    /// checks. Zero means exact boundary semantics: a token is rejected the
    /// second it expires.
    pub fn new(key: &VerificationKey, clock_skew_seconds: u32) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // exp and nbf are checked below with an explicit clock and the
        // configured skew; jsonwebtoken's wall-clock checks stay off so the
        // boundary is ours to define.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        // Audience is an upstream-service concern; the gateway must not
        // reject tokens that carry one.
        validation.validate_aud = false;

        Self {
            decoding_key: key.decoding_key().clone(),
            validation,
            clock_skew_seconds,
        }
    }

    /// Verify a bearer token and return its claims.
    ///
    /// Check order: size/structure, signature, `exp`, then `nbf` (only if
    /// present).
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let result = self.verify_at(token, chrono::Utc::now().timestamp());

        match &result {
            Ok(_) => metrics::record_token_validation("ok"),
            Err(e) => metrics::record_token_validation(e.as_str()),
        }

        result
    }

    /// Verification with an explicit clock, for deterministic tests.
    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, VerifyError> {
        if token.is_empty() || token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "guard.verifier",
                size = token.len(),
                "Token rejected before parsing"
            );
            return Err(VerifyError::Malformed);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(target: "guard.verifier", error = %e, "Token failed decoding");
            map_jwt_error(&e)
        })?;

        check_expiry(data.claims.exp, self.clock_skew_seconds, now)?;
        if let Some(nbf) = data.claims.nbf {
            check_not_before(nbf, self.clock_skew_seconds, now)?;
        }

        Ok(data.claims)
    }
}

/// Map jsonwebtoken failures onto the guard's taxonomy.
///
/// Everything that is not a signature mismatch or a time-window failure is
/// malformed input: bad structure, bad base64, bad JSON, wrong or missing
/// algorithm, missing required claims.
fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> VerifyError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        ErrorKind::ImmatureSignature => VerifyError::NotYetValid,
        _ => VerifyError::Malformed,
    }
}

/// A token is expired once `now` reaches `exp` plus the allowed skew.
///
/// Boundary: with zero skew, a token is valid at `exp - 1` and rejected at
/// `exp` and after.
fn check_expiry(exp: i64, clock_skew_seconds: u32, now: i64) -> Result<(), VerifyError> {
    if now >= exp.saturating_add(i64::from(clock_skew_seconds)) {
        return Err(VerifyError::Expired);
    }
    Ok(())
}

/// A token is not yet valid while `nbf` is further in the future than the
/// allowed skew. Valid from `nbf` itself onward.
fn check_not_before(nbf: i64, clock_skew_seconds: u32, now: i64) -> Result<(), VerifyError> {
    if nbf > now.saturating_add(i64::from(clock_skew_seconds)) {
        return Err(VerifyError::NotYetValid);
    }
    Ok(())
}
