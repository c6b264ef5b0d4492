//! Request interception pipeline.
//!
//! The guard's decision surface is an explicit, ordered list of interceptor
//! stages. Each stage sees a [`RequestContext`] and yields a [`Verdict`]:
//! forward to the next stage (and ultimately upstream), or reject. The first
//! rejection short-circuits the rest of the pipeline.
//!
//! Composition is explicit: stages are pushed in order at startup (or in a
//! test), nothing is discovered or registered behind the scenes. Stages are
//! synchronous and share-nothing; all mutable state lives in the per-request
//! context.

use crate::claims::Claims;
use crate::verifier::VerifyError;
use axum::http::Method;
use std::sync::Arc;

/// Why a request was rejected. Internal only: feeds logs and metrics, never
/// the external response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Protected route with no usable `Authorization: Bearer` header.
    MissingCredentials,
    MalformedToken,
    InvalidSignature,
    TokenExpired,
    TokenNotYetValid,
}

impl RejectReason {
    /// Stable label for logs and metrics. Never shown to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingCredentials => "missing_credentials",
            RejectReason::MalformedToken => "malformed_token",
            RejectReason::InvalidSignature => "invalid_signature",
            RejectReason::TokenExpired => "token_expired",
            RejectReason::TokenNotYetValid => "token_not_yet_valid",
        }
    }
}

impl From<VerifyError> for RejectReason {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Malformed => RejectReason::MalformedToken,
            VerifyError::InvalidSignature => RejectReason::InvalidSignature,
            VerifyError::Expired => RejectReason::TokenExpired,
            VerifyError::NotYetValid => RejectReason::TokenNotYetValid,
        }
    }
}

/// Outcome of one stage (and of the pipeline as a whole).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    Reject(RejectReason),
}

/// The pipeline's view of one request, plus the identity slot stages fill in.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    authorization: Option<String>,
    identity: Option<Claims>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, authorization: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            authorization,
            identity: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw `Authorization` header value, if the request carried one.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Attach the verified identity for downstream consumers.
    pub fn attach_identity(&mut self, claims: Claims) {
        self.identity = Some(claims);
    }

    pub fn identity(&self) -> Option<&Claims> {
        self.identity.as_ref()
    }

    /// Move the identity out, for handing over to request extensions.
    pub fn take_identity(&mut self) -> Option<Claims> {
        self.identity.take()
    }
}

/// One stage of the pipeline.
pub trait Interceptor: Send + Sync {
    /// Stage name for rejection logs.
    fn name(&self) -> &'static str;

    fn intercept(&self, ctx: &mut RequestContext) -> Verdict;
}

/// Ordered interceptor stages with short-circuit rejection.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn with_stage(mut self, stage: Arc<dyn Interceptor>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Run every stage in order, stopping at the first rejection.
    pub fn run(&self, ctx: &mut RequestContext) -> Verdict {
        for stage in &self.stages {
            if let Verdict::Reject(reason) = stage.intercept(ctx) {
                tracing::debug!(
                    target: "guard.pipeline",
                    stage = stage.name(),
                    reason = reason.as_str(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    "Request rejected"
                );
                return Verdict::Reject(reason);
            }
        }
        Verdict::Forward
    }
}
