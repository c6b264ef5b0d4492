//! End-to-end access control scenarios
//!
//! These tests spawn a real guarded server with the production rule table
//! and drive it over HTTP, covering the canonical traffic the gateway sees:
//! public logins, public reads, protected writes, and protected reads with
//! valid, expired, and forged tokens.

use guard_test_utils::fixtures::ROGUE_PRIVATE_KEY_PEM;
use guard_test_utils::{TestGateway, TestToken};
use reqwest::StatusCode;

// ============================================================================
// Public Routes
// ============================================================================

/// A login request carries no token by definition; the guard must let it
/// through to the auth upstream untouched.
#[tokio::test]
async fn test_login_without_token_is_forwarded() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/auth/login", gateway.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Anonymous login should reach the upstream"
    );

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["token"].as_str(), Some("issued-by-upstream"));

    Ok(())
}

/// Catalog reads are public for anonymous browsing.
#[tokio::test]
async fn test_public_read_without_token_is_forwarded() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let response = reqwest::get(format!("{}/api/v1/hoteles/5", gateway.url())).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["id"], 5);

    Ok(())
}

/// Public routes skip verification entirely, so even a garbage token
/// must not block an anonymous-permitted request.
#[tokio::test]
async fn test_public_read_ignores_garbage_token() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/hoteles/5", gateway.url()))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

// ============================================================================
// Protected Routes
// ============================================================================

/// Catalog reads are public, but the same path is protected for writes.
#[tokio::test]
async fn test_protected_write_without_token_is_rejected() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/hoteles/5", gateway.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(
        response.status(),
        StatusCode::UNAUTHORIZED,
        "Anonymous writes must be rejected"
    );
    assert!(
        response.headers().contains_key("www-authenticate"),
        "401 must carry a WWW-Authenticate challenge"
    );

    Ok(())
}

/// A valid token opens the protected route and its identity reaches the
/// upstream handler.
#[tokio::test]
async fn test_valid_token_forwards_with_identity() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let token = TestToken::new().subject("user-42").sign();

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .bearer_auth(token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["reserva"], 10);
    assert_eq!(
        body["sub"].as_str(),
        Some("user-42"),
        "Verified subject should reach the upstream handler"
    );

    Ok(())
}

/// Authorization schemes are case-insensitive: a lowercase `bearer`
/// prefix must authenticate exactly like the canonical spelling.
#[tokio::test]
async fn test_lowercase_bearer_scheme_is_accepted() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let token = TestToken::new().subject("user-42").sign();

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .header("Authorization", format!("bearer {token}"))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["sub"].as_str(), Some("user-42"));

    Ok(())
}

/// A valid token also opens protected writes.
#[tokio::test]
async fn test_valid_token_opens_protected_write() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let token = TestToken::new().subject("manager-1").sign();

    // Act
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/hoteles/5", gateway.url()))
        .bearer_auth(token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["updated"], true);

    Ok(())
}

/// An expired token is as good as no token.
#[tokio::test]
async fn test_expired_token_is_rejected() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let token = TestToken::new().subject("user-42").expired().sign();

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .bearer_auth(token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// A structurally perfect token signed by the wrong key must be rejected.
#[tokio::test]
async fn test_wrong_key_token_is_rejected() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let token = TestToken::new()
        .subject("user-42")
        .sign_with(ROGUE_PRIVATE_KEY_PEM);

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .bearer_auth(token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Requests for paths the gateway has no route for still hit the guard
/// first: a protected path is rejected with 401, never revealed as 404.
#[tokio::test]
async fn test_unrouted_protected_path_is_rejected_not_404() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;

    // Act
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/v1/pagos/99", gateway.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

// ============================================================================
// Clock Skew
// ============================================================================

/// With a 300 second tolerance a recently expired token still passes,
/// but one expired beyond the tolerance does not.
#[tokio::test]
async fn test_clock_skew_tolerance_end_to_end() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn_with_skew(300).await?;
    let client = reqwest::Client::new();

    // Act & Assert: expired 100 seconds ago, inside the tolerance
    let recent = TestToken::new().expires_in(-100).sign();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .bearer_auth(recent)
        .send()
        .await?;
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Token expired 100s ago should pass with 300s skew"
    );

    // Act & Assert: expired 400 seconds ago, beyond the tolerance
    let old = TestToken::new().expires_in(-400).sign();
    let response = client
        .get(format!("{}/api/v1/reservas/10", gateway.url()))
        .bearer_auth(old)
        .send()
        .await?;
    assert_eq!(
        response.status(),
        StatusCode::UNAUTHORIZED,
        "Token expired 400s ago should fail with 300s skew"
    );

    Ok(())
}
