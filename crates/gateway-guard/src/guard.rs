//! The access-guard pipeline stage.
//!
//! Resolves the route's access level first: public routes are forwarded
//! without the token ever being inspected, so an expired or garbage token
//! cannot break a login request. Protected routes require a well-formed
//! `Authorization: Bearer` header and a token the verifier accepts; the
//! verified claims are attached to the context for downstream handlers.

use crate::observability::metrics;
use crate::pipeline::{Interceptor, RejectReason, RequestContext, Verdict};
use crate::rules::{Access, RuleTable};
use crate::verifier::TokenVerifier;

pub struct AccessGuard {
    rules: RuleTable,
    verifier: TokenVerifier,
}

impl AccessGuard {
    pub fn new(rules: RuleTable, verifier: TokenVerifier) -> Self {
        Self { rules, verifier }
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively per RFC 7235, so `bearer` and
/// `BEARER` authenticate like the canonical spelling. Any other scheme
/// counts as missing credentials.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme.eq_ignore_ascii_case("Bearer").then_some(token)
}

impl Interceptor for AccessGuard {
    fn name(&self) -> &'static str {
        "access-guard"
    }

    fn intercept(&self, ctx: &mut RequestContext) -> Verdict {
        match self.rules.decide(ctx.method(), ctx.path()) {
            Access::Public => {
                tracing::trace!(
                    target: "guard.access",
                    method = %ctx.method(),
                    path = %ctx.path(),
                    "Public route, forwarding without identity"
                );
                metrics::record_guard_decision("forwarded", "public_route");
                Verdict::Forward
            }
            Access::AuthRequired => {
                let token = match ctx.authorization().and_then(bearer_token) {
                    Some(token) => token,
                    None => {
                        metrics::record_guard_decision(
                            "rejected",
                            RejectReason::MissingCredentials.as_str(),
                        );
                        return Verdict::Reject(RejectReason::MissingCredentials);
                    }
                };

                match self.verifier.verify(token) {
                    Ok(claims) => {
                        ctx.attach_identity(claims);
                        metrics::record_guard_decision("forwarded", "verified");
                        Verdict::Forward
                    }
                    Err(err) => {
                        let reason = RejectReason::from(err);
                        metrics::record_guard_decision("rejected", reason.as_str());
                        Verdict::Reject(reason)
                    }
                }
            }
        }
    }
}
