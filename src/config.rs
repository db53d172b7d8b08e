//! Client configuration parsed from build-time environment variables.
//!
//! DESIGN
//! ======
//! The browser has no process environment, so the `csr` build bakes values in
//! with `option_env!`. Parsing goes through a lookup function so the same
//! rules are exercised natively in tests.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_MOCK_LATENCY_MS: u32 = 300;
pub const DEFAULT_SESSION_NOTICE_COOLDOWN_MS: u32 = 1_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key} (expected {expected})")]
    Invalid { key: &'static str, value: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin every request path is appended to.
    pub api_base_url: String,
    /// Requests still pending after this long count as a network failure.
    pub request_timeout_ms: u32,
    /// Master switch for local mock responses. Off in production builds.
    pub mock_fallback: bool,
    /// Simulated latency before a mock response resolves.
    pub mock_latency_ms: u32,
    /// How long "session expired" stays suppressed after the login redirect.
    pub session_notice_cooldown_ms: u32,
    /// Path prefixes that fall back to mock data on 401/403 instead of
    /// logging out. Only consulted when `mock_fallback` is on.
    pub mock_on_auth_failure: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            mock_fallback: false,
            mock_latency_ms: DEFAULT_MOCK_LATENCY_MS,
            session_notice_cooldown_ms: DEFAULT_SESSION_NOTICE_COOLDOWN_MS,
            mock_on_auth_failure: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Build config from values captured at compile time.
    ///
    /// - `PETCARE_API_BASE_URL`: default `http://localhost:8081`
    /// - `PETCARE_REQUEST_TIMEOUT_MS`: default 15000
    /// - `PETCARE_MOCK_FALLBACK`: `true`/`false`, default `false`
    /// - `PETCARE_MOCK_LATENCY_MS`: default 300
    /// - `PETCARE_SESSION_NOTICE_COOLDOWN_MS`: default 1000
    /// - `PETCARE_MOCK_ON_AUTH_FAILURE`: comma-separated path prefixes
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag holds something other than `true`/`false`.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                "PETCARE_API_BASE_URL" => option_env!("PETCARE_API_BASE_URL"),
                "PETCARE_REQUEST_TIMEOUT_MS" => option_env!("PETCARE_REQUEST_TIMEOUT_MS"),
                "PETCARE_MOCK_FALLBACK" => option_env!("PETCARE_MOCK_FALLBACK"),
                "PETCARE_MOCK_LATENCY_MS" => option_env!("PETCARE_MOCK_LATENCY_MS"),
                "PETCARE_SESSION_NOTICE_COOLDOWN_MS" => option_env!("PETCARE_SESSION_NOTICE_COOLDOWN_MS"),
                "PETCARE_MOCK_ON_AUTH_FAILURE" => option_env!("PETCARE_MOCK_ON_AUTH_FAILURE"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag holds something other than `true`/`false`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("PETCARE_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());

        Ok(Self {
            api_base_url,
            request_timeout_ms: parse_u32(&lookup, "PETCARE_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
            mock_fallback: parse_flag(&lookup, "PETCARE_MOCK_FALLBACK")?,
            mock_latency_ms: parse_u32(&lookup, "PETCARE_MOCK_LATENCY_MS", DEFAULT_MOCK_LATENCY_MS),
            session_notice_cooldown_ms: parse_u32(
                &lookup,
                "PETCARE_SESSION_NOTICE_COOLDOWN_MS",
                DEFAULT_SESSION_NOTICE_COOLDOWN_MS,
            ),
            mock_on_auth_failure: parse_list(lookup("PETCARE_MOCK_ON_AUTH_FAILURE").as_deref()),
        })
    }
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        _ => Err(ConfigError::Invalid { key, value: raw, expected: "true or false" }),
    }
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
