//! Access-guard enforcement middleware.
//!
//! Bridges the synchronous interceptor pipeline into axum: builds a
//! [`RequestContext`] from the request parts, runs the pipeline, and either
//! forwards the request (with any attached identity moved into request
//! extensions) or returns the uniform unauthorized response.

use crate::claims::Claims;
use crate::errors::GuardError;
use crate::pipeline::{Pipeline, RequestContext, Verdict};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the guard middleware.
#[derive(Clone)]
pub struct GuardState {
    /// The interceptor pipeline, assembled at startup.
    pub pipeline: Arc<Pipeline>,
}

impl GuardState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Guard middleware that runs the pipeline over every request.
///
/// # Response
///
/// - Returns 401 Unauthorized with WWW-Authenticate header if the pipeline
///   rejects the request, regardless of the rejection reason
/// - Continues to the next handler otherwise, with verified claims (if the
///   pipeline attached any) available in request extensions
#[instrument(skip(state, req, next), name = "guard.middleware.enforce")]
pub async fn enforce(
    State(state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, GuardError> {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let mut ctx = RequestContext::new(
        req.method().clone(),
        req.uri().path().to_owned(),
        authorization,
    );

    match state.pipeline.run(&mut ctx) {
        Verdict::Forward => {
            // Hand the verified identity (if any) to downstream handlers.
            if let Some(claims) = ctx.take_identity() {
                req.extensions_mut().insert(claims);
            }
            Ok(next.run(req).await)
        }
        Verdict::Reject(reason) => Err(GuardError::Unauthorized(reason)),
    }
}

/// Extension trait for extracting claims from request.
///
/// Provides a convenient method for handlers to get the verified identity.
pub trait ClaimsExt {
    /// Get the verified claims from request extensions.
    ///
    /// Returns `None` on public routes and on routes the guard middleware
    /// was not applied to.
    fn claims(&self) -> Option<&Claims>;
}

impl<B> ClaimsExt for axum::extract::Request<B> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }
}
