use super::*;

// =============================================================================
// COOKIE MODEL
// =============================================================================

#[test]
fn credential_cookie_standard_attributes() {
    let cookie = StoredCookie::credential(ACCESS_TOKEN_COOKIE, "tok", SESSION_TTL, true);
    assert_eq!(cookie.name, "accessToken");
    assert_eq!(cookie.value, "tok");
    assert_eq!(cookie.path, "/");
    assert!(cookie.secure);
    assert_eq!(cookie.same_site, SameSite::Strict);
    assert_eq!(cookie.max_age, Duration::hours(24));
}

#[test]
fn cleared_cookie_is_tombstone() {
    let cookie = StoredCookie::cleared(REFRESH_TOKEN_COOKIE, false);
    assert!(cookie.value.is_empty());
    assert_eq!(cookie.max_age, Duration::ZERO);
    assert!(!cookie.is_live());
}

#[test]
fn live_requires_value_and_positive_max_age() {
    let live = StoredCookie::credential("a", "v", Duration::seconds(1), false);
    assert!(live.is_live());
    let empty = StoredCookie::credential("a", "", Duration::seconds(1), false);
    assert!(!empty.is_live());
    let expired = StoredCookie::credential("a", "v", Duration::ZERO, false);
    assert!(!expired.is_live());
}

// =============================================================================
// LIFETIME POLICY
// =============================================================================

#[test]
fn login_ttl_without_remember_me_is_one_day() {
    assert_eq!(login_ttl(false).whole_seconds(), 86_400);
}

#[test]
fn login_ttl_with_remember_me_is_thirty_days() {
    assert_eq!(login_ttl(true).whole_seconds(), 2_592_000);
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[test]
fn set_then_get_round_trips() {
    let store = MemoryCredentialStore::new();
    store.set(StoredCookie::credential(ACCESS_TOKEN_COOKIE, "tok", SESSION_TTL, false));
    assert_eq!(store.value(ACCESS_TOKEN_COOKIE).as_deref(), Some("tok"));
}

#[test]
fn get_ignores_cleared_cookie_but_raw_sees_tombstone() {
    let store = MemoryCredentialStore::new();
    store.set(StoredCookie::credential(ACCESS_TOKEN_COOKIE, "tok", SESSION_TTL, false));
    store.clear(ACCESS_TOKEN_COOKIE, false);

    assert!(store.get(ACCESS_TOKEN_COOKIE).is_none());
    assert!(store.value(ACCESS_TOKEN_COOKIE).is_none());

    let raw = store.raw(ACCESS_TOKEN_COOKIE).unwrap();
    assert!(raw.value.is_empty());
    assert_eq!(raw.max_age, Duration::ZERO);
}

#[test]
fn get_missing_cookie_is_none() {
    let store = MemoryCredentialStore::new();
    assert!(store.get("nope").is_none());
}

#[test]
fn set_overwrites_previous_value() {
    let store = MemoryCredentialStore::new();
    store.set(StoredCookie::credential(ACCESS_TOKEN_COOKIE, "first", SESSION_TTL, false));
    store.set(StoredCookie::credential(ACCESS_TOKEN_COOKIE, "second", REMEMBER_ME_TTL, false));
    let cookie = store.get(ACCESS_TOKEN_COOKIE).unwrap();
    assert_eq!(cookie.value, "second");
    assert_eq!(cookie.max_age, REMEMBER_ME_TTL);
}

#[test]
fn clones_share_storage() {
    let store = MemoryCredentialStore::new();
    let view = store.clone();
    store.set(StoredCookie::credential(REFRESH_TOKEN_COOKIE, "r", SESSION_TTL, false));
    assert_eq!(view.value(REFRESH_TOKEN_COOKIE).as_deref(), Some("r"));
}
