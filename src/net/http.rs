//! Request pipeline shared by every backend call.
//!
//! PIPELINE
//! ========
//! 1. Request stage: attach `Authorization: Bearer <token>` when signed in.
//! 2. Transport: send, or fail with a `TransportError`.
//! 3. Classify the exchange into an `Outcome`.
//! 4. Dispatch: run the global side effects for that outcome (session
//!    expiry, notifications, mock fallback) and hand the caller either the
//!    unwrapped body or an `ApiError`.
//!
//! Mock data is only ever consulted when `FallbackPolicy::enabled` is set.
//! Auth failures additionally need the request path to be allow-listed.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::expiry::ExpiryLatch;
use super::fallback::{FallbackResolver, NoFallback};
use super::outcome::{Outcome, classify};
use super::transport::{OutboundRequest, Transport, TransportError};
use crate::config::{ClientConfig, DEFAULT_SESSION_NOTICE_COOLDOWN_MS};
use crate::router::routes::LOGIN_PATH;
use crate::router::{LogNavigator, Navigator};
use crate::state::auth::AuthStore;
use crate::state::notice::{LogNotifier, Notice, Notifier};
use crate::util::time::now_ms;

pub const AUTHORIZATION: &str = "Authorization";

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please sign in again";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please check your connection";
pub const SERVER_ERROR_MESSAGE: &str = "Server error, please try again later";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";

/// What a resource wrapper's caller sees when a call fails.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("session expired")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {}", message.as_deref().unwrap_or("-"))]
    NotFound { message: Option<String> },
    #[error("server error {status}: {}", message.as_deref().unwrap_or("-"))]
    Server { status: u16, message: Option<String> },
    #[error("request failed with status {status}: {}", message.as_deref().unwrap_or("-"))]
    Http { status: u16, message: Option<String> },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// When mock data may stand in for a real response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub enabled: bool,
    /// Path prefixes for which 401/403 fall back instead of failing.
    pub on_auth_failure: Vec<String>,
}

impl FallbackPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self { enabled: config.mock_fallback, on_auth_failure: config.mock_on_auth_failure.clone() }
    }

    pub fn allows_auth_fallback(&self, path: &str) -> bool {
        self.enabled && self.on_auth_failure.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Add the bearer header for `token`; an empty token leaves the request as is.
pub fn attach_bearer(mut request: OutboundRequest, token: &str) -> OutboundRequest {
    if token.is_empty() {
        return request;
    }
    request.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(AUTHORIZATION));
    request.headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
    request
}

/// Token carried by the bearer header of an already-sent request, or `""`.
fn sent_token(request: &OutboundRequest) -> &str {
    request
        .header(AUTHORIZATION)
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
}

/// Cheap-to-clone handle; clones share the session, latch and collaborators.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    auth: AuthStore,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    fallback: Rc<dyn FallbackResolver>,
    policy: FallbackPolicy,
    latch: Rc<RefCell<ExpiryLatch>>,
}

pub struct ApiClientBuilder {
    transport: Rc<dyn Transport>,
    auth: AuthStore,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    fallback: Rc<dyn FallbackResolver>,
    policy: FallbackPolicy,
    cooldown_ms: u32,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn notifier(mut self, notifier: Rc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Rc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn fallback(mut self, fallback: Rc<dyn FallbackResolver>, policy: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn session_cooldown_ms(mut self, cooldown_ms: u32) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            transport: self.transport,
            auth: self.auth,
            notifier: self.notifier,
            navigator: self.navigator,
            fallback: self.fallback,
            policy: self.policy,
            latch: Rc::new(RefCell::new(ExpiryLatch::new(self.cooldown_ms))),
        }
    }
}

impl ApiClient {
    pub fn builder(transport: Rc<dyn Transport>, auth: AuthStore) -> ApiClientBuilder {
        ApiClientBuilder {
            transport,
            auth,
            notifier: Rc::new(LogNotifier),
            navigator: Rc::new(LogNavigator),
            fallback: Rc::new(NoFallback),
            policy: FallbackPolicy::default(),
            cooldown_ms: DEFAULT_SESSION_NOTICE_COOLDOWN_MS,
        }
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn notifier(&self) -> &Rc<dyn Notifier> {
        &self.notifier
    }

    /// Send `request` and decode the unwrapped body into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] reports, plus `Decode` when the body
    /// does not have the expected shape.
    pub async fn request<T: DeserializeOwned>(&self, request: OutboundRequest) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Run one call through the full pipeline and return the response body.
    ///
    /// # Errors
    ///
    /// One `ApiError` variant per failure class. The side effects for that
    /// class (logout, redirect, notification) have already happened.
    pub async fn send(&self, request: OutboundRequest) -> Result<Value, ApiError> {
        let request = attach_bearer(request, &self.auth.token());
        leptos::logging::log!(
            "api: {} {} bearer={}",
            request.method,
            request.path,
            request.header(AUTHORIZATION).is_some()
        );

        let outcome = classify(self.transport.send(&request).await);
        self.dispatch(&request, outcome).await
    }

    async fn dispatch(&self, request: &OutboundRequest, outcome: Outcome) -> Result<Value, ApiError> {
        match outcome {
            Outcome::Success(body) => Ok(body),
            Outcome::TransportFailure(e) => {
                leptos::logging::warn!("api: {} {} no response: {e}", request.method, request.path);
                if let Some(body) = self.try_fallback(request).await {
                    return Ok(body);
                }
                self.notifier.notify(Notice::error(NETWORK_ERROR_MESSAGE));
                Err(ApiError::Transport(e))
            }
            Outcome::AuthExpired => {
                leptos::logging::warn!("api: {} {} -> 401", request.method, request.path);
                if self.policy.allows_auth_fallback(&request.path)
                    && let Some(body) = self.try_fallback(request).await
                {
                    return Ok(body);
                }
                self.expire_session(sent_token(request));
                Err(ApiError::Unauthorized)
            }
            Outcome::Forbidden => {
                leptos::logging::warn!("api: {} {} -> 403", request.method, request.path);
                if self.policy.allows_auth_fallback(&request.path)
                    && let Some(body) = self.try_fallback(request).await
                {
                    return Ok(body);
                }
                self.notifier.notify(Notice::warning(FORBIDDEN_MESSAGE));
                Err(ApiError::Forbidden)
            }
            Outcome::NotFound { message } => {
                leptos::logging::warn!("api: {} {} -> 404", request.method, request.path);
                if let Some(body) = self.try_fallback(request).await {
                    return Ok(body);
                }
                self.notifier.notify(Notice::error(message.as_deref().unwrap_or(NOT_FOUND_MESSAGE)));
                Err(ApiError::NotFound { message })
            }
            Outcome::ServerError { status, message } => {
                leptos::logging::error!("api: {} {} -> {status}", request.method, request.path);
                self.notifier.notify(Notice::error(SERVER_ERROR_MESSAGE));
                Err(ApiError::Server { status, message })
            }
            Outcome::Unknown { status, message } => {
                leptos::logging::warn!("api: {} {} -> {status}", request.method, request.path);
                let text = message.clone().unwrap_or_else(|| format!("Request failed ({status})"));
                self.notifier.notify(Notice::error(text));
                Err(ApiError::Http { status, message })
            }
        }
    }

    async fn try_fallback(&self, request: &OutboundRequest) -> Option<Value> {
        if !self.policy.enabled {
            return None;
        }
        let body = self.fallback.resolve(request).await?;
        leptos::logging::log!("api: {} {} answered from mock data", request.method, request.path);
        Some(body)
    }

    /// Clear the session the 401 was issued for; notify and redirect once
    /// per episode. A 401 for a token that has since been replaced by a new
    /// sign-in leaves the new session alone.
    fn expire_session(&self, sent_token: &str) {
        let current = self.auth.token();
        if !current.is_empty() && current != sent_token {
            leptos::logging::log!("api: ignoring 401 for a replaced session");
            return;
        }
        self.auth.clear_auth();

        let first = self.latch.borrow_mut().try_begin(now_ms());
        if !first {
            leptos::logging::log!("api: session expiry already being handled");
            return;
        }

        self.notifier.notify(Notice::warning(SESSION_EXPIRED_MESSAGE));
        self.navigator.navigate(LOGIN_PATH);
        self.latch.borrow_mut().redirect_done(now_ms());
    }
}
