//! Test server harness for end-to-end gateway tests
//!
//! Provides TestGateway for spawning a real guarded server instance in
//! tests. The harness mounts stub handlers standing in for the upstream
//! hotel-platform services, behind the production rule table and a real
//! verifier, so scenarios exercise the exact request path of production.

use crate::fixtures::test_verification_key;
use axum::extract::{Path, Request};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use gateway_guard::guard::AccessGuard;
use gateway_guard::handlers;
use gateway_guard::middleware::{enforce, ClaimsExt, GuardState};
use gateway_guard::observability::metrics::init_metrics_recorder;
use gateway_guard::pipeline::Pipeline;
use gateway_guard::rules::RuleTable;
use gateway_guard::verifier::TokenVerifier;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the guarded gateway in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_public_route() -> Result<(), anyhow::Error> {
///     let gateway = TestGateway::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/api/v1/hoteles/5", gateway.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestGateway {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Spawn a gateway with strict expiry (zero clock skew).
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_skew(0).await
    }

    /// Spawn a gateway with the given JWT clock skew tolerance.
    ///
    /// The server will:
    /// - Verify tokens against the primary test key
    /// - Authorize routes from the production rule table
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn_with_skew(clock_skew_seconds: u32) -> Result<Self, anyhow::Error> {
        let verifier = TokenVerifier::new(&test_verification_key(), clock_skew_seconds);
        let guard = AccessGuard::new(RuleTable::gateway_defaults(), verifier);
        let state = GuardState::new(Pipeline::new().with_stage(Arc::new(guard)));

        // Initialize metrics recorder for the test server.
        // Note: This may fail if already installed in the test process.
        // In that case, we create a new recorder without installing it globally.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let recorder = PrometheusBuilder::new().build_recorder();
                recorder.handle()
            }
        };

        let metrics_routes = Router::new()
            .route("/actuator/metrics", get(handlers::metrics_handler))
            .with_state(metrics_handle);

        // Upstream stubs plus the gateway's own operational endpoints,
        // all behind the guard like in production
        let app = upstream_routes()
            .route("/actuator/health", get(handlers::health_check))
            .merge(metrics_routes)
            .layer(middleware::from_fn_with_state(state, enforce));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        // Explicitly abort the HTTP server task to ensure immediate cleanup
        // when the test completes.
        self._handle.abort();
    }
}

/// Stub routes standing in for the upstream services the gateway fronts.
fn upstream_routes() -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login_stub))
        .route("/api/v1/hoteles/:id", get(hotel_stub).post(update_hotel_stub))
        .route("/api/v1/reservas/:id", get(reservation_stub))
}

/// Public login endpoint; reachable without credentials.
async fn login_stub() -> Json<Value> {
    Json(json!({ "token": "issued-by-upstream" }))
}

/// Public hotel read.
async fn hotel_stub(Path(id): Path<u32>) -> Json<Value> {
    Json(json!({ "id": id, "nombre": "Hotel Test" }))
}

/// Protected hotel mutation; only reachable with a verified token.
async fn update_hotel_stub(Path(id): Path<u32>) -> Json<Value> {
    Json(json!({ "id": id, "updated": true }))
}

/// Protected reservation read; echoes the verified identity the guard
/// attached, so tests can assert the claims crossed the middleware.
async fn reservation_stub(Path(id): Path<u32>, req: Request) -> Json<Value> {
    let sub = req.claims().and_then(|c| c.sub.clone());
    Json(json!({ "reserva": id, "sub": sub }))
}
