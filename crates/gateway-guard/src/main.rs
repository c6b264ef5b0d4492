//! Gateway Access Guard
//!
//! Entry point for the hotel platform API gateway's access-control service.
//! Every piece of guard state is built here, once, and composed explicitly:
//!
//! 1. Load configuration from environment
//! 2. Load and sanitize the RSA verification key (fatal on failure)
//! 3. Build the token verifier and the route rule table
//! 4. Assemble the interceptor pipeline
//! 5. Initialize the Prometheus metrics recorder
//! 6. Serve with graceful shutdown on SIGINT/SIGTERM

use gateway_guard::config::Config;
use gateway_guard::guard::AccessGuard;
use gateway_guard::keys::VerificationKey;
use gateway_guard::middleware::GuardState;
use gateway_guard::observability::metrics::init_metrics_recorder;
use gateway_guard::pipeline::Pipeline;
use gateway_guard::routes;
use gateway_guard::rules::RuleTable;
use gateway_guard::verifier::TokenVerifier;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway_guard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gateway Access Guard");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        jwt_clock_skew_seconds = config.jwt_clock_skew_seconds,
        "Configuration loaded successfully"
    );

    // Load the verification key. A service that cannot verify tokens must
    // not come up, so any key problem is fatal here.
    let key = VerificationKey::from_pem(&config.public_key_pem).map_err(|e| {
        error!("Failed to load JWT verification key: {}", e);
        e
    })?;

    info!(
        fingerprint = %key.fingerprint(),
        "Verification key loaded"
    );

    // Build the verifier and the route rule table
    let verifier = TokenVerifier::new(&key, config.jwt_clock_skew_seconds);
    let rules = RuleTable::gateway_defaults();

    info!(rules = rules.len(), "Route rules loaded");

    // Assemble the interceptor pipeline
    let guard = AccessGuard::new(rules, verifier);
    let pipeline = Pipeline::new().with_stage(Arc::new(guard));
    let state = GuardState::new(pipeline);

    // Initialize Prometheus metrics recorder
    // This must happen before any metrics are recorded
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!(error = %e, "Failed to install Prometheus metrics recorder");
        e
    })?;

    info!("Prometheus metrics recorder initialized");

    // Build application routes
    let app = routes::build_routes(state, metrics_handle);

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Gateway Access Guard listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Gateway Access Guard shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
