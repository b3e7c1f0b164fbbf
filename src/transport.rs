//! Request descriptor, response type, and the transport seam.
//!
//! The client core never talks to `reqwest` directly; it dispatches
//! immutable [`ApiRequest`] descriptors through the [`Transport`] trait so
//! tests can script backend responses. [`ReqwestTransport`] is the real
//! implementation.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Immutable description of one outbound call.
///
/// `retried` marks a descriptor that has already been through one
/// refresh-and-retry cycle. It is only ever set by [`ApiRequest::into_retried`];
/// the original descriptor is never mutated in place.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
    pub retried: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: None,
            bearer: None,
            retried: false,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serialization error when `body` cannot be represented
    /// as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Descriptor with the given bearer credential attached (or none).
    #[must_use]
    pub fn with_bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_string);
        self
    }

    /// Descriptor marked as having consumed its one refresh-and-retry
    /// cycle.
    #[must_use]
    pub fn into_retried(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// Raw backend response: status plus body text. Interpretation (success,
/// error message extraction, JSON decoding) is the caller's concern.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Backend-provided error message, when the body is a JSON object
    /// with a `message` field; otherwise the raw body.
    #[must_use]
    pub fn message(&self) -> String {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| self.body.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http client build failed: {0}")]
    ClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Dispatch seam between the client core and the wire.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

/// Real transport over a shared `reqwest` client.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build the transport with request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] when the underlying client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
