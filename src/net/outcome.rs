//! Response classification.
//!
//! Every exchange is reduced to an `Outcome` before the pipeline runs any
//! side effect, so the status-code policy reads as one `match`.

#[cfg(test)]
#[path = "outcome_test.rs"]
mod outcome_test;

use serde_json::Value;

use super::transport::{RawResponse, TransportError};

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// 2xx with the unwrapped body (`Null` when empty).
    Success(Value),
    /// No response received.
    TransportFailure(TransportError),
    /// 401.
    AuthExpired,
    /// 403.
    Forbidden,
    /// 404.
    NotFound { message: Option<String> },
    /// 5xx.
    ServerError { status: u16, message: Option<String> },
    /// Any other status.
    Unknown { status: u16, message: Option<String> },
}

/// Classify the result of one transport call.
pub fn classify(result: Result<RawResponse, TransportError>) -> Outcome {
    let resp = match result {
        Ok(resp) => resp,
        Err(e) => return Outcome::TransportFailure(e),
    };

    match resp.status {
        200..=299 => Outcome::Success(parse_body(&resp.body)),
        401 => Outcome::AuthExpired,
        403 => Outcome::Forbidden,
        404 => Outcome::NotFound { message: server_message(&resp.body) },
        500..=599 => Outcome::ServerError { status: resp.status, message: server_message(&resp.body) },
        status => Outcome::Unknown { status, message: server_message(&resp.body) },
    }
}

/// JSON body, or the raw text when the server answered something else.
pub fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

/// The `message` field of an error body, if the server sent one.
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
