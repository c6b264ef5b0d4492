//! Route access rules.
//!
//! An ordered table of `(methods, path pattern) -> access level` entries,
//! scanned top to bottom with first match winning. Construction always
//! appends the deny-by-default catch-all `ANY /** -> AuthRequired` as the
//! final entry, so every request resolves to exactly one access level and
//! a forgotten rule fails closed.
//!
//! Pattern semantics:
//! - `**` matches any number of path segments, including zero
//! - `*` matches exactly one segment
//! - literal segments compare case-sensitively
//! - matching is segment-based: `/api/v1/hotelesX` does not match
//!   `/api/v1/hoteles/**`
//! - trailing slashes are insignificant on both pattern and path

use axum::http::Method;

/// Access level a rule grants to matching requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Forward without identity; the token (if any) is not even inspected.
    Public,
    /// Only forward with a verified identity attached.
    AuthRequired,
}

/// One segment of a parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment.
    Single,
    /// `**`: zero or more segments.
    Multi,
}

/// A glob-style path pattern, parsed into segments at construction.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::Single,
                "**" => Segment::Multi,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Multi, rest)) => {
            // Let `**` consume zero segments first, then progressively more.
            (0..=path.len()).any(|skip| {
                path.get(skip..)
                    .map_or(false, |tail| match_segments(rest, tail))
            })
        }
        Some((Segment::Single, rest)) => path
            .split_first()
            .map_or(false, |(_, tail)| match_segments(rest, tail)),
        Some((Segment::Literal(literal), rest)) => path
            .split_first()
            .map_or(false, |(head, tail)| {
                head == literal && match_segments(rest, tail)
            }),
    }
}

/// Which HTTP methods a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    /// No restriction.
    Any,
    /// Exactly one method.
    Only(Method),
}

impl MethodMatcher {
    fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Any => true,
            MethodMatcher::Only(m) => m == method,
        }
    }
}

/// A single access rule.
#[derive(Debug, Clone)]
pub struct AccessRule {
    methods: MethodMatcher,
    pattern: PathPattern,
    access: Access,
}

impl AccessRule {
    pub fn new(methods: MethodMatcher, pattern: &str, access: Access) -> Self {
        Self {
            methods,
            pattern: PathPattern::parse(pattern),
            access,
        }
    }

    /// Public for every method.
    pub fn public(pattern: &str) -> Self {
        Self::new(MethodMatcher::Any, pattern, Access::Public)
    }

    /// Public for GET only; other methods fall through to later rules.
    pub fn public_get(pattern: &str) -> Self {
        Self::new(MethodMatcher::Only(Method::GET), pattern, Access::Public)
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.matches(method) && self.pattern.matches(path)
    }
}

/// Ordered rule table with a mandatory catch-all.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AccessRule>,
}

impl RuleTable {
    /// Build a table from rules in priority order.
    ///
    /// The catch-all `ANY /** -> AuthRequired` is appended unconditionally;
    /// callers cannot construct a table that leaves any request unmatched.
    pub fn new(mut rules: Vec<AccessRule>) -> Self {
        rules.push(AccessRule::new(
            MethodMatcher::Any,
            "/**",
            Access::AuthRequired,
        ));
        Self { rules }
    }

    /// The production table for the hotel platform gateway.
    pub fn gateway_defaults() -> Self {
        Self::new(vec![
            // Authentication flows must be reachable without a token.
            AccessRule::public("/api/v1/auth/login"),
            AccessRule::public("/api/v1/auth/register"),
            AccessRule::public("/api/v1/auth/refresh"),
            AccessRule::public("/api/v1/auth/validate"),
            AccessRule::public("/api/v1/auth/password/**"),
            // Contact form and OAuth token exchange.
            AccessRule::public("/api/v1/contacto/**"),
            AccessRule::public("/api/v1/oauth/token"),
            // Operational endpoints, both bare and under the API prefix.
            AccessRule::public("/actuator/**"),
            AccessRule::public("/api/v1/actuator/**"),
            // Catalog browsing is public read-only; writes fall through to
            // the catch-all and require identity.
            AccessRule::public_get("/api/v1/hoteles/**"),
            AccessRule::public_get("/api/v1/departamentos/**"),
            AccessRule::public_get("/api/v1/habitaciones/**"),
            AccessRule::public_get("/api/v1/tipos-habitacion/**"),
        ])
    }

    /// Resolve the access level for a request. First matching rule wins.
    pub fn decide(&self, method: &Method, path: &str) -> Access {
        for rule in &self.rules {
            if rule.matches(method, path) {
                return rule.access;
            }
        }
        // Unreachable: the catch-all matches everything. Deny anyway.
        Access::AuthRequired
    }

    /// Number of rules, including the catch-all. Logged at startup.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
