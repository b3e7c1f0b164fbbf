use super::*;

// =============================================================================
// ApiConfig::from_env — env manipulation requires unsafe in edition 2024.
// We wrap in unsafe blocks; these tests run serially (single test thread).
// =============================================================================

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_api_env() {
    unsafe {
        std::env::remove_var("API_BASE_URL");
        std::env::remove_var("COOKIE_SECURE");
    }
}

#[test]
fn from_env_defaults() {
    unsafe { clear_api_env() };
    let config = ApiConfig::from_env();
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert!(!config.cookie_secure);
}

#[test]
fn from_env_strips_trailing_slash() {
    unsafe {
        clear_api_env();
        std::env::set_var("API_BASE_URL", "https://api.example.com/v1/");
    }
    let config = ApiConfig::from_env();
    assert_eq!(config.base_url, "https://api.example.com/v1");
    unsafe { clear_api_env() };
}

#[test]
fn from_env_derives_secure_from_scheme() {
    unsafe {
        clear_api_env();
        std::env::set_var("API_BASE_URL", "https://api.example.com");
    }
    assert!(ApiConfig::from_env().cookie_secure);
    unsafe { clear_api_env() };
}

#[test]
fn from_env_secure_override_wins() {
    unsafe {
        clear_api_env();
        std::env::set_var("API_BASE_URL", "https://api.example.com");
        std::env::set_var("COOKIE_SECURE", "false");
    }
    assert!(!ApiConfig::from_env().cookie_secure);
    unsafe { clear_api_env() };
}

#[test]
fn default_matches_env_defaults() {
    assert_eq!(ApiConfig::default().base_url, DEFAULT_BASE_URL);
    assert!(!ApiConfig::default().cookie_secure);
}

// =============================================================================
// env_bool
// =============================================================================

#[test]
fn env_bool_parses_truthy_and_falsy() {
    unsafe { std::env::set_var("CD_TEST_FLAG", "YES") };
    assert_eq!(env_bool("CD_TEST_FLAG"), Some(true));
    unsafe { std::env::set_var("CD_TEST_FLAG", " 0 ") };
    assert_eq!(env_bool("CD_TEST_FLAG"), Some(false));
    unsafe { std::env::set_var("CD_TEST_FLAG", "maybe") };
    assert_eq!(env_bool("CD_TEST_FLAG"), None);
    unsafe { std::env::remove_var("CD_TEST_FLAG") };
    assert_eq!(env_bool("CD_TEST_FLAG"), None);
}
