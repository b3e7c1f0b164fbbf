//! Session resolution and the authenticated-user record.
//!
//! STATE MACHINE
//! =============
//! `Init → Loading → Resolved` per application lifecycle. A resolved
//! session holds either a user or nothing; `authenticated → unauthenticated`
//! happens on logout or on any later failed resolution. There is no
//! transition back without another `resolve` call (the login flow stores
//! tokens directly and relies on a page transition to re-run resolution).

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::client::{ApiClient, ApiError, LOGOUT_PATH, Navigator, SESSION_PATH};
use crate::credentials::{ACCESS_TOKEN_COOKIE, StoredCookie};
use crate::guard::LOGIN_PATH;
use crate::transport::{ApiRequest, Transport};

pub const ADMIN_AUTHORITY: &str = "ADMIN";

const GENERIC_RESOLVE_ERROR: &str = "session could not be resolved";

/// Authenticated user as reported by the backend. Owned by the session
/// manager; the view layer only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
    pub enabled: bool,
}

impl User {
    /// True when the authority set contains the literal `ADMIN`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.authorities.iter().any(|a| a == ADMIN_AUTHORITY)
    }
}

/// Where the session context is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Init,
    Loading,
    Resolved,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct SessionEnvelope {
    status: String,
    #[serde(default)]
    data: Option<SessionData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionData {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
    /// Remaining token lifetime in milliseconds.
    #[serde(default)]
    expires_in: Option<i64>,
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

struct SessionInner {
    phase: SessionPhase,
    user: Option<User>,
    error: Option<String>,
}

/// Explicit session context: user, lifecycle phase, and last resolution
/// error, behind one lock. All reads go through accessors so the state is
/// never shared mutably with callers.
pub struct SessionManager<T: Transport, N: Navigator> {
    client: Arc<ApiClient<T, N>>,
    inner: Mutex<SessionInner>,
}

impl<T: Transport, N: Navigator> SessionManager<T, N> {
    #[must_use]
    pub fn new(client: Arc<ApiClient<T, N>>) -> Self {
        Self {
            client,
            inner: Mutex::new(SessionInner {
                phase: SessionPhase::Init,
                user: None,
                error: None,
            }),
        }
    }

    /// Ask the backend who the current user is and update the context.
    ///
    /// Envelope contract: `{status, data: {user, token, expiresIn}}`. On a
    /// `"success"` status with a user, the user is stored and the returned
    /// access token is re-stored with its declared lifetime (`expiresIn`
    /// milliseconds). Any other success shape leaves the user absent
    /// without an error. A backend error keeps its message as the
    /// resolution error; any other failure records a generic one. The
    /// phase is `Resolved` afterwards in every case.
    pub async fn resolve(&self) {
        self.set_phase(SessionPhase::Loading);

        let outcome = self.client.execute(ApiRequest::get(SESSION_PATH)).await;
        let mut inner = self.lock();
        inner.phase = SessionPhase::Resolved;
        match outcome {
            Ok(response) => {
                inner.error = None;
                inner.user = None;
                if let Ok(envelope) = response.json::<SessionEnvelope>() {
                    if envelope.status == "success" {
                        if let Some(data) = envelope.data {
                            if let Some(user) = data.user {
                                inner.user = Some(user);
                                self.restore_access_cookie(data.token.as_deref(), data.expires_in);
                            }
                        }
                    }
                }
            }
            Err(ApiError::Status { message, .. }) => {
                inner.user = None;
                inner.error = Some(message);
            }
            Err(_) => {
                inner.user = None;
                inner.error = Some(GENERIC_RESOLVE_ERROR.to_string());
            }
        }
    }

    /// Best-effort server logout, then unconditional local teardown:
    /// both cookies cleared, user dropped, navigation to the login
    /// boundary. The server call's failure is logged, never surfaced.
    pub async fn logout(&self) {
        if let Err(err) = self.client.execute(ApiRequest::post(LOGOUT_PATH)).await {
            tracing::warn!(error = %err, "logout request failed");
        }

        self.client.clear_credentials();
        {
            let mut inner = self.lock();
            inner.user = None;
        }
        if self.client.navigator().current_path().is_some() {
            self.client.navigator().navigate(LOGIN_PATH);
        }
    }

    /// Derived, never stored: a user is authenticated only while both the
    /// in-memory record and a live `accessToken` cookie exist. A stale
    /// record with an expired or cleared cookie does not count.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let has_user = self.lock().user.is_some();
        has_user && self.client.store().value(ACCESS_TOKEN_COOKIE).is_some()
    }

    /// Exact-match authority check; false when no user is resolved.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.lock()
            .user
            .as_ref()
            .is_some_and(|u| u.authorities.iter().any(|a| a == role))
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    fn restore_access_cookie(&self, token: Option<&str>, expires_in_ms: Option<i64>) {
        let (Some(token), Some(ms)) = (token, expires_in_ms) else {
            return;
        };
        self.client.store().set(StoredCookie::credential(
            ACCESS_TOKEN_COOKIE,
            token,
            Duration::seconds(ms / 1000),
            self.client.config().cookie_secure,
        ));
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.lock().phase = phase;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
