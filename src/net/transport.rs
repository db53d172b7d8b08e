//! Outbound request descriptors and the HTTP transport seam.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, raced against a
//! `gloo-timers` timeout.
//! Native: `UnavailableTransport` reports every call as unreachable, the same
//! way server-side stubs answer "not available" for browser-only endpoints.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::config::ClientConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One backend call: path relative to the API base URL, plus body/query.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), headers: Vec::new(), body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serializer message if `body` cannot be represented as JSON.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, String> {
        self.body = Some(serde_json::to_value(body).map_err(|e| e.to_string())?);
        Ok(self)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// No response was received.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u32 },
    #[error("http transport not available in this build")]
    Unavailable,
}

/// Sends a prepared request and returns whatever the server answered.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Join the configured base URL and a request path.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") }
}

/// Transport used by builds without a browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait::async_trait(?Send)]
impl Transport for UnavailableTransport {
    async fn send(&self, _request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        Err(TransportError::Unavailable)
    }
}

/// `gloo-net` transport with a request timeout.
#[cfg(feature = "csr")]
#[derive(Clone, Debug)]
pub struct GlooTransport {
    base_url: String,
    timeout_ms: u32,
}

#[cfg(feature = "csr")]
impl GlooTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self { base_url: config.api_base_url.clone(), timeout_ms: config.request_timeout_ms }
    }

    async fn exchange(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let url = join_url(&self.base_url, &request.path);
        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Delete => GlooMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&url)
            .method(method)
            .query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let prepared = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| TransportError::Network(e.to_string()))?,
            None => builder
                .header("Content-Type", "application/json")
                .build()
                .map_err(|e| TransportError::Network(e.to_string()))?,
        };

        let resp = prepared
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(RawResponse { status, body })
    }
}

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        use futures::future::{Either, select};

        let timeout = crate::util::time::sleep(std::time::Duration::from_millis(u64::from(self.timeout_ms)));
        let exchange = self.exchange(request);
        match select(Box::pin(exchange), Box::pin(timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(TransportError::Timeout { ms: self.timeout_ms }),
        }
    }
}

/// The transport for the current build target.
pub fn default_transport(config: &ClientConfig) -> Rc<dyn Transport> {
    #[cfg(feature = "csr")]
    {
        Rc::new(GlooTransport::new(config))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = config;
        Rc::new(UnavailableTransport)
    }
}
