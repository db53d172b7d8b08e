use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_empty() {
    let cfg = ClientConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert!(!cfg.mock_fallback);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("PETCARE_API_BASE_URL", "https://pets.example.test/"),
        ("PETCARE_REQUEST_TIMEOUT_MS", "5000"),
        ("PETCARE_MOCK_FALLBACK", "true"),
        ("PETCARE_MOCK_LATENCY_MS", "0"),
        ("PETCARE_SESSION_NOTICE_COOLDOWN_MS", "250"),
        ("PETCARE_MOCK_ON_AUTH_FAILURE", " /api/admin/roles, /api/admin/users ,"),
    ]))
    .unwrap();

    assert_eq!(cfg.api_base_url, "https://pets.example.test");
    assert_eq!(cfg.request_timeout_ms, 5000);
    assert!(cfg.mock_fallback);
    assert_eq!(cfg.mock_latency_ms, 0);
    assert_eq!(cfg.session_notice_cooldown_ms, 250);
    assert_eq!(cfg.mock_on_auth_failure, vec!["/api/admin/roles", "/api/admin/users"]);
}

#[test]
fn from_lookup_bad_number_falls_back_to_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("PETCARE_REQUEST_TIMEOUT_MS", "soon")])).unwrap();
    assert_eq!(cfg.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
}

#[test]
fn from_lookup_bad_flag_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("PETCARE_MOCK_FALLBACK", "maybe")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid { key: "PETCARE_MOCK_FALLBACK", value: "maybe".to_owned(), expected: "true or false" }
    );
    assert!(err.to_string().contains("PETCARE_MOCK_FALLBACK"));
}

#[test]
fn from_lookup_blank_base_url_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("PETCARE_API_BASE_URL", "  ")])).unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}
