//! Credential cookies and the store that holds them.
//!
//! LIFETIME POLICY
//! ===============
//! Both tokens are minted at login with the same lifetime: 24 hours, or
//! 30 days when the user checked "remember me" (the flag is read once, at
//! login). A refresh never touches the refresh cookie and always mints a
//! fixed 24-hour access token, regardless of the original choice.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use time::Duration;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

pub const SESSION_TTL: Duration = Duration::hours(24);
pub const REMEMBER_ME_TTL: Duration = Duration::days(30);

/// Cookie `SameSite` attribute. Credential cookies are always `Strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// A cookie as held by the store: value plus the attributes it was
/// issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub max_age: Duration,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
}

impl StoredCookie {
    /// Build a credential cookie with the standard attributes
    /// (`path=/`, `SameSite=Strict`).
    #[must_use]
    pub fn credential(name: &str, value: &str, max_age: Duration, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            max_age,
            path: "/".to_string(),
            secure,
            same_site: SameSite::Strict,
        }
    }

    /// Tombstone for `name`: empty value, zero max-age, same attributes.
    #[must_use]
    pub fn cleared(name: &str, secure: bool) -> Self {
        Self::credential(name, "", Duration::ZERO, secure)
    }

    /// A cookie is live when it still carries a value and a positive
    /// max-age. Cleared or expired cookies are invisible to readers.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.value.is_empty() && self.max_age > Duration::ZERO
    }
}

/// Lifetime applied to both cookies at login, selected once from the
/// remember-me flag.
#[must_use]
pub fn login_ttl(remember_me: bool) -> Duration {
    if remember_me { REMEMBER_ME_TTL } else { SESSION_TTL }
}

// =============================================================================
// STORE
// =============================================================================

/// Request-scoped persisted key/value store for credential cookies.
///
/// Implementations must make `clear` observable as a tombstone write
/// (empty value, zero max-age) rather than a plain removal, since that is
/// what a browser receives to delete a cookie.
pub trait CredentialStore: Send + Sync {
    fn set(&self, cookie: StoredCookie);
    /// Live cookie by name, `None` when absent, cleared, or expired.
    fn get(&self, name: &str) -> Option<StoredCookie>;
    fn clear(&self, name: &str, secure: bool);

    /// Value of a live cookie by name.
    fn value(&self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value)
    }
}

/// In-memory [`CredentialStore`]. Tombstones are retained so callers can
/// observe the clearing write.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<HashMap<String, StoredCookie>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record by name, tombstones included.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<StoredCookie> {
        let inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.get(name).cloned()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, cookie: StoredCookie) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.insert(cookie.name.clone(), cookie);
    }

    fn get(&self, name: &str) -> Option<StoredCookie> {
        let inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.get(name).filter(|c| c.is_live()).cloned()
    }

    fn clear(&self, name: &str, secure: bool) {
        self.set(StoredCookie::cleared(name, secure));
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
