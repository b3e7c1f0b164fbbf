//! Edge route guard — pre-render redirect decisions from cookie presence.
//!
//! Not a security boundary: the backend stays authoritative, the guard
//! only short-circuits navigation. The authentication check is an
//! injectable predicate (presence by default) so a signature or expiry
//! check can replace it without touching call sites. A predicate error
//! fails closed to the login boundary.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

use crate::credentials::ACCESS_TOKEN_COOKIE;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Paths that require a session. A trailing `/*` segment matches any
/// sub-path.
pub const PROTECTED_PATTERNS: &[&str] = &[
    "/dashboard",
    "/dashboard/*",
    "/inventory",
    "/inventory/*",
    "/sales",
    "/sales/*",
    "/purchases",
    "/purchases/*",
    "/suppliers",
    "/suppliers/*",
    "/customers",
    "/customers/*",
    "/reports",
    "/reports/*",
    "/settings",
    "/settings/*",
];

/// Paths only meaningful without a session.
pub const AUTH_PATTERNS: &[&str] = &["/login", "/register"];

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("authentication check failed: {0}")]
    Check(String),
}

/// Outcome of classifying one inbound navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

type AuthCheck = dyn Fn(Option<&str>) -> Result<bool, GuardError> + Send + Sync;

pub struct RouteGuard {
    check: Box<AuthCheck>,
}

impl RouteGuard {
    /// Guard with the default presence check: any non-empty token value
    /// counts as plausibly authenticated.
    #[must_use]
    pub fn new() -> Self {
        Self::with_check(|token| Ok(token.is_some_and(|t| !t.is_empty())))
    }

    /// Guard with a custom plausibility predicate.
    pub fn with_check<F>(check: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<bool, GuardError> + Send + Sync + 'static,
    {
        Self { check: Box::new(check) }
    }

    /// Classify `path` given the access-token cookie value on the request.
    #[must_use]
    pub fn decide(&self, path: &str, token: Option<&str>) -> RouteDecision {
        let authenticated = match (self.check)(token) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, path, "route classification failed, redirecting to login");
                return RouteDecision::Redirect(LOGIN_PATH.to_string());
            }
        };

        if authenticated {
            if matches_any(AUTH_PATTERNS, path) {
                return RouteDecision::Redirect(DASHBOARD_PATH.to_string());
            }
            return RouteDecision::Allow;
        }

        if matches_any(AUTH_PATTERNS, path) {
            return RouteDecision::Allow;
        }
        if matches_any(PROTECTED_PATTERNS, path) {
            return RouteDecision::Redirect(format!("{LOGIN_PATH}?callbackUrl={}", urlencoding::encode(path)));
        }
        RouteDecision::Allow
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_any(patterns: &[&str], path: &str) -> bool {
    patterns.iter().any(|pattern| matches_pattern(pattern, path))
}

/// Exact match, or prefix match for patterns ending in a `/*` segment.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/*") {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    } else {
        pattern == path
    }
}

// =============================================================================
// AXUM MIDDLEWARE
// =============================================================================

/// Edge middleware applying [`RouteGuard::decide`] to every request,
/// reading the access-token cookie from the request headers.
pub async fn edge_guard(State(guard): State<Arc<RouteGuard>>, request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar.get(ACCESS_TOKEN_COOKIE).map(Cookie::value).map(str::to_owned);
    let path = request.uri().path().to_owned();

    match guard.decide(&path, token.as_deref()) {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::Redirect(target) => Redirect::temporary(&target).into_response(),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
