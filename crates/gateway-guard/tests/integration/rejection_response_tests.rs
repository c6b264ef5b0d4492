//! External rejection response tests
//!
//! Whatever the internal reason, the response crossing the trust boundary
//! must be byte-identical: one status, one challenge header, one body.
//! A caller probing the gateway learns nothing about why it was refused.

use guard_test_utils::fixtures::ROGUE_PRIVATE_KEY_PEM;
use guard_test_utils::{TestGateway, TestToken};
use reqwest::StatusCode;

const PROTECTED_PATH: &str = "/api/v1/reservas/10";

/// Collect the externally visible parts of a rejection.
async fn rejection_parts(
    gateway: &TestGateway,
    authorization: Option<String>,
) -> Result<(StatusCode, String, String), anyhow::Error> {
    let client = reqwest::Client::new();
    let mut request = client.get(format!("{}{}", gateway.url(), PROTECTED_PATH));
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }

    let response = request.send().await?;
    let status = response.status();
    let challenge = response
        .headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.text().await?;

    Ok((status, challenge, body))
}

/// Every rejection reason produces the identical external response.
#[tokio::test]
async fn test_rejection_is_identical_for_every_reason() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    let cases: Vec<Option<String>> = vec![
        // Missing credentials
        None,
        // Non-bearer scheme
        Some("Basic dXNlcjpwYXNz".to_string()),
        // Malformed token
        Some("Bearer not-a-jwt".to_string()),
        // Expired token
        Some(format!("Bearer {}", TestToken::new().expired().sign())),
        // Wrong signing key
        Some(format!(
            "Bearer {}",
            TestToken::new().sign_with(ROGUE_PRIVATE_KEY_PEM)
        )),
    ];

    // Act
    let mut observed = Vec::new();
    for authorization in cases {
        observed.push(rejection_parts(&gateway, authorization).await?);
    }

    // Assert: all rejections are 401 and indistinguishable from each other
    let first = observed.first().expect("at least one rejection case");
    for parts in &observed {
        assert_eq!(parts.0, StatusCode::UNAUTHORIZED);
        assert_eq!(parts, first, "Rejections must not differ by reason");
    }

    Ok(())
}

/// The 401 carries a Bearer challenge naming the gateway realm.
#[tokio::test]
async fn test_rejection_carries_bearer_challenge() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let (status, challenge, _) = rejection_parts(&gateway, None).await?;

    // Assert
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge, r#"Bearer realm="hotel-gateway""#);

    Ok(())
}

/// The body is the fixed generic envelope and never names the reason.
#[tokio::test]
async fn test_rejection_body_reveals_no_reason() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let expired = format!("Bearer {}", TestToken::new().expired().sign());

    // Act
    let (_, _, body) = rejection_parts(&gateway, Some(expired)).await?;

    // Assert
    let json: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(
        json,
        serde_json::json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": "Authentication required"
            }
        })
    );

    let lowered = body.to_lowercase();
    for leak in ["expired", "signature", "malformed", "not yet valid"] {
        assert!(
            !lowered.contains(leak),
            "Rejection body must not mention '{leak}'"
        );
    }

    Ok(())
}
