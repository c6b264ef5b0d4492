//! Operational endpoint tests
//!
//! Health and metrics endpoints have to answer without credentials, or
//! orchestrators mark the gateway unhealthy the moment it boots.

use guard_test_utils::TestGateway;

// ============================================================================
// Health
// ============================================================================

/// Health probes carry no Authorization header and must still get 200.
#[tokio::test]
async fn test_health_endpoint_is_public() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/actuator/health", gateway.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await?, r#"{"status":"UP"}"#);

    Ok(())
}

// ============================================================================
// Metrics
// ============================================================================

/// Prometheus scrapes are anonymous; the guard must wave them through.
#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<(), anyhow::Error> {
    // Arrange
    let gateway = TestGateway::spawn().await?;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/actuator/metrics", gateway.url()))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    Ok(())
}
