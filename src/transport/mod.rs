//! HTTP transport seam.
//!
//! The [`Dispatcher`](crate::Dispatcher) never talks to the network itself:
//! it hands a method, an absolute URL and [`TransportOptions`] to a
//! [`Transport`] and gets a [`TransportResponse`] back. [`HttpTransport`] is
//! the reqwest-backed default; tests and embedders can inject their own.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::request::Method;

/// Everything the transport needs besides method and URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportOptions {
    /// Request headers, in the order they should be sent.
    pub headers: Vec<(String, String)>,
    /// Query parameters appended to the URL (already flattened).
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub json: Option<Value>,
}

impl TransportOptions {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw HTTP response as captured by a transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Response with a serialized JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response
            .headers
            .push(("content-type".to_string(), "application/vnd.api+json".to_string()));
        response
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failure.
///
/// Carries the server's response when one was captured (e.g. a client that
/// raises on 4xx/5xx); `response` is `None` for connection-level failures.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub response: Option<TransportResponse>,
}

impl TransportError {
    /// Failure with no response at all.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// Failure that still captured the server's response.
    pub fn with_response(message: impl Into<String>, response: TransportResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }
}

/// Capability that performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging (e.g. `"reqwest"`).
    fn name(&self) -> &str;

    /// Send `method url` with `options` and return the captured response.
    async fn invoke(
        &self,
        method: Method,
        url: &str,
        options: TransportOptions,
    ) -> std::result::Result<TransportResponse, TransportError>;
}
