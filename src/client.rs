//! HTTP client core — bearer injection, 401 intercept, refresh-and-retry.
//!
//! CONTRACT
//! ========
//! Every outbound call carries the stored access token when one exists. A
//! 401 on a not-yet-retried request triggers exactly one token refresh and
//! one re-dispatch of the original request; the retried result is returned
//! to the caller as-is. A failed refresh clears both credential cookies
//! and forces navigation to the login boundary.
//!
//! CONCURRENCY
//! ===========
//! Concurrent 401s share a single in-flight refresh: the refresh gate is a
//! `tokio::sync::Mutex`, and a waiter that observes the stored token
//! already changed reuses it instead of issuing its own refresh.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::credentials::{
    ACCESS_TOKEN_COOKIE, CredentialStore, REFRESH_TOKEN_COOKIE, SESSION_TTL, StoredCookie, login_ttl,
};
use crate::guard::LOGIN_PATH;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

pub const AUTHENTICATE_PATH: &str = "/auth/authenticate";
pub const REFRESH_PATH: &str = "/auth/refresh-token";
pub const SESSION_PATH: &str = "/auth/session";
pub const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("failed to encode or decode payload: {0}")]
    Codec(String),
}

/// Navigation seam for forced redirects to the login boundary.
///
/// `current_path` returns `None` outside a browser navigation context, in
/// which case the client never navigates.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> Option<String>;
    fn navigate(&self, path: &str);
}

/// Navigator for headless contexts; never navigates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn current_path(&self) -> Option<String> {
        None
    }

    fn navigate(&self, _path: &str) {}
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateRequest<'a> {
    email: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient<T: Transport, N: Navigator> {
    config: ApiConfig,
    store: Arc<dyn CredentialStore>,
    transport: T,
    navigator: N,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl<T: Transport, N: Navigator> ApiClient<T, N> {
    pub fn new(config: ApiConfig, store: Arc<dyn CredentialStore>, transport: T, navigator: N) -> Self {
        Self {
            config,
            store,
            transport,
            navigator,
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Dispatch a request with the stored access token attached,
    /// transparently recovering from a single expired-token 401.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] for non-2xx responses (including a 401 that has
    /// already consumed its retry), [`ApiError::RefreshFailed`] when the
    /// refresh token is missing or rejected, [`ApiError::Transport`] for
    /// wire failures.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = self.store.value(ACCESS_TOKEN_COOKIE);
        let response = self
            .transport
            .dispatch(&request.clone().with_bearer(token.as_deref()))
            .await?;

        if response.status != 401 || request.retried {
            return settle(response);
        }

        let retried = request.into_retried();
        match self.refresh_access_token(token.as_deref()).await {
            Ok(fresh) => {
                let response = self
                    .transport
                    .dispatch(&retried.with_bearer(Some(&fresh)))
                    .await?;
                settle(response)
            }
            Err(err) => {
                self.clear_credentials();
                self.redirect_to_login();
                Err(err)
            }
        }
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; additionally [`ApiError::Codec`] when
    /// the body does not decode as `R`.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(ApiRequest::get(path)).await?;
        response.json().map_err(|e| ApiError::Codec(e.to_string()))
    }

    /// `POST` a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; additionally [`ApiError::Codec`] for
    /// encode/decode failures.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let request = ApiRequest::post(path)
            .json(body)
            .map_err(|e| ApiError::Codec(e.to_string()))?;
        let response = self.execute(request).await?;
        response.json().map_err(|e| ApiError::Codec(e.to_string()))
    }

    /// Authenticate and store both credential cookies. The remember-me
    /// flag is read here, once; it selects the lifetime of both cookies.
    ///
    /// Dispatched outside [`ApiClient::execute`]: a 401 here means bad
    /// credentials, not an expired token, and must not trigger a refresh.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] with the backend message on rejected
    /// credentials.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> Result<(), ApiError> {
        let request = ApiRequest::post(AUTHENTICATE_PATH)
            .json(&AuthenticateRequest { email, password, remember_me })
            .map_err(|e| ApiError::Codec(e.to_string()))?;
        let response = settle(self.transport.dispatch(&request).await?)?;
        let issued: AuthenticateResponse = response.json().map_err(|e| ApiError::Codec(e.to_string()))?;

        let ttl = login_ttl(remember_me);
        let secure = self.config.cookie_secure;
        self.store
            .set(StoredCookie::credential(ACCESS_TOKEN_COOKIE, &issued.access_token, ttl, secure));
        if let Some(refresh) = &issued.refresh_token {
            self.store
                .set(StoredCookie::credential(REFRESH_TOKEN_COOKIE, refresh, ttl, secure));
        }
        Ok(())
    }

    /// Single-flight token refresh. `stale` is the access token observed
    /// by the failing request; when the stored token has already moved on
    /// by the time the gate is acquired, that fresh token is reused.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.store.value(ACCESS_TOKEN_COOKIE) {
            if stale != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let refresh_token = self
            .store
            .value(REFRESH_TOKEN_COOKIE)
            .ok_or_else(|| ApiError::RefreshFailed("no refresh token stored".to_string()))?;
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest { refresh_token })
            .map_err(|e| ApiError::Codec(e.to_string()))?;
        let response = self.transport.dispatch(&request).await?;
        if !response.is_success() {
            return Err(ApiError::RefreshFailed(response.message()));
        }
        let issued: RefreshResponse = response.json().map_err(|e| ApiError::Codec(e.to_string()))?;

        // Refreshed tokens always get the fixed session lifetime; the
        // refresh cookie is left untouched.
        self.store.set(StoredCookie::credential(
            ACCESS_TOKEN_COOKIE,
            &issued.access_token,
            SESSION_TTL,
            self.config.cookie_secure,
        ));
        Ok(issued.access_token)
    }

    pub(crate) fn clear_credentials(&self) {
        let secure = self.config.cookie_secure;
        self.store.clear(ACCESS_TOKEN_COOKIE, secure);
        self.store.clear(REFRESH_TOKEN_COOKIE, secure);
    }

    fn redirect_to_login(&self) {
        if let Some(path) = self.navigator.current_path() {
            if path != LOGIN_PATH {
                self.navigator.navigate(LOGIN_PATH);
            }
        }
    }
}

fn settle(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: response.status,
            message: response.message(),
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
