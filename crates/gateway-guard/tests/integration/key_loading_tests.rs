//! Key loading round-trip tests
//!
//! Deployment environments tend to mangle multi-line PEM values: literal
//! `\n` escapes from JSON-wrapped env files, CRLF from Windows tooling,
//! stray backslashes from shell quoting. Whatever the damage, the loaded
//! key must be byte-identical to one loaded from the pristine PEM, and
//! tokens must verify the same way.

use gateway_guard::keys::VerificationKey;
use gateway_guard::verifier::TokenVerifier;
use guard_test_utils::fixtures::{test_verification_key, PRIMARY_PUBLIC_KEY_PEM};
use guard_test_utils::TestToken;

// ============================================================================
// Round-trip equality
// ============================================================================

/// Literal `\n` escapes (the classic docker-compose env mangling).
#[tokio::test]
async fn test_escaped_newlines_yield_identical_key() -> Result<(), anyhow::Error> {
    // Arrange
    let mangled = PRIMARY_PUBLIC_KEY_PEM.replace('\n', "\\n");

    // Act
    let key = VerificationKey::from_pem(&mangled)?;

    // Assert
    assert_eq!(key.fingerprint(), test_verification_key().fingerprint());
    assert_eq!(key.der(), test_verification_key().der());

    Ok(())
}

/// CRLF line endings plus literal `\r` escapes.
#[tokio::test]
async fn test_carriage_returns_yield_identical_key() -> Result<(), anyhow::Error> {
    // Arrange
    let crlf = PRIMARY_PUBLIC_KEY_PEM.replace('\n', "\r\n");
    let escaped_cr = PRIMARY_PUBLIC_KEY_PEM.replace('\n', "\\r\\n");

    // Act & Assert
    let expected = test_verification_key().fingerprint();
    assert_eq!(VerificationKey::from_pem(&crlf)?.fingerprint(), expected);
    assert_eq!(
        VerificationKey::from_pem(&escaped_cr)?.fingerprint(),
        expected
    );

    Ok(())
}

/// A bare single-line base64 body, markers lost somewhere in deployment.
#[tokio::test]
async fn test_single_line_body_yields_identical_key() -> Result<(), anyhow::Error> {
    // Arrange
    let body: String = PRIMARY_PUBLIC_KEY_PEM
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();

    // Act
    let key = VerificationKey::from_pem(&body)?;

    // Assert
    assert_eq!(key.fingerprint(), test_verification_key().fingerprint());

    Ok(())
}

/// The whole PEM folded onto one line with spaces, markers kept inline
/// with the body. Seen when an env value is pasted through tooling that
/// collapses newlines.
#[tokio::test]
async fn test_inline_markers_on_one_line_yield_identical_key() -> Result<(), anyhow::Error> {
    // Arrange
    let folded = PRIMARY_PUBLIC_KEY_PEM.replace('\n', " ");

    // Act
    let key = VerificationKey::from_pem(&folded)?;

    // Assert
    assert_eq!(key.fingerprint(), test_verification_key().fingerprint());
    assert_eq!(key.der(), test_verification_key().der());

    Ok(())
}

// ============================================================================
// Behavioral equivalence
// ============================================================================

/// A key recovered from a mangled PEM verifies real tokens.
#[tokio::test]
async fn test_mangled_key_verifies_tokens() -> Result<(), anyhow::Error> {
    // Arrange
    let mangled = PRIMARY_PUBLIC_KEY_PEM.replace('\n', "\\n");
    let key = VerificationKey::from_pem(&mangled)?;
    let verifier = TokenVerifier::new(&key, 0);

    let token = TestToken::new().subject("roundtrip-user").sign();

    // Act
    let claims = verifier.verify(&token)?;

    // Assert
    assert_eq!(claims.sub.as_deref(), Some("roundtrip-user"));

    Ok(())
}
