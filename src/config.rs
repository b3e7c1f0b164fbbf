//! API configuration loaded from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Backend connection settings shared by the client core and the
/// credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL prefixed onto every request path.
    pub base_url: String,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Build config from environment variables.
    ///
    /// - `API_BASE_URL`: base URL for all backend calls, default
    ///   `http://localhost:8080/api`. A trailing slash is stripped.
    /// - `COOKIE_SECURE`: explicit override for the cookie `Secure`
    ///   attribute; when unset, derived from the base URL scheme.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or_else(|| base_url.starts_with("https://"));
        Self { base_url, cookie_secure }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_secure: false,
        }
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
