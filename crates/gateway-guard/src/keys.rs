//! RSA verification key loading.
//!
//! The public key arrives through environment configuration, where PEM text
//! rarely survives intact: deployment tooling turns newlines into literal
//! `\n` two-character sequences, Windows editors add carriage returns, and
//! quoting layers leave stray backslashes behind. Loading normalizes all of
//! that back into the DER the key was originally encoded from, so the same
//! key material produces the same verification key no matter which transport
//! mangled it.
//!
//! Key loading happens once at startup. A key that cannot be recovered is a
//! fatal configuration error, never a per-request condition.

use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::DecodingKey;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading the verification key.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("Public key contains no key material after normalization")]
    EmptyKey,

    #[error("Public key body is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Public key is not a valid RSA public key: {0}")]
    InvalidKey(String),
}

const BEGIN_MARKER: &str = "-----BEGIN PUBLIC KEY-----";
const END_MARKER: &str = "-----END PUBLIC KEY-----";

/// An RSA public key ready for signature verification.
///
/// Holds both the decoded SPKI DER (for fingerprinting and comparison) and
/// the `jsonwebtoken` decoding key built from it.
pub struct VerificationKey {
    der: Vec<u8>,
    decoding_key: DecodingKey,
}

impl VerificationKey {
    /// Load a verification key from PEM text, tolerating the usual
    /// environment-variable mangling.
    ///
    /// Normalization steps, in order:
    /// 1. Drop literal `\r` and `\n` escape sequences, stray backslashes,
    ///    and real carriage returns.
    /// 2. Remove the `BEGIN PUBLIC KEY` / `END PUBLIC KEY` markers as
    ///    substrings. Markers may sit anywhere, not just on their own
    ///    lines: transports that fold newlines to spaces leave them inline
    ///    with the body.
    /// 3. Remove all remaining whitespace.
    /// 4. Base64-decode the body into SPKI DER.
    /// 5. Parse the DER as an RSA public key.
    pub fn from_pem(raw: &str) -> Result<Self, KeyLoadError> {
        let text = raw
            .replace("\\r", "")
            .replace("\\n", "")
            .replace('\\', "")
            .replace('\r', "")
            .replace(BEGIN_MARKER, "")
            .replace(END_MARKER, "");

        let body: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        if body.is_empty() {
            return Err(KeyLoadError::EmptyKey);
        }

        let der = general_purpose::STANDARD.decode(&body)?;

        // Rebuild a clean PEM around the normalized body. The PEM parser does
        // not care about line width, so the single-line body is fine.
        let pem = format!("{BEGIN_MARKER}\n{body}\n{END_MARKER}\n");
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| KeyLoadError::InvalidKey(e.to_string()))?;

        tracing::debug!(
            target: "guard.keys",
            der_len = der.len(),
            "Verification key loaded"
        );

        Ok(Self { der, decoding_key })
    }

    /// The SPKI DER bytes this key was decoded from.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The decoding key for signature verification.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Lowercase-hex SHA-256 of the SPKI DER.
    ///
    /// Logged at startup so operators can confirm which key a deployment is
    /// running with, without ever logging the key itself.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }
}

// DecodingKey has no Debug impl; show the fingerprint instead of key bytes.
impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
