//! reqwest-backed [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Transport, TransportError, TransportOptions, TransportResponse};
use crate::request::Method;
use crate::{HuginError, Result};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport over a shared reqwest [`Client`].
///
/// Mirrors a client that raises on error statuses: any non-2xx answer comes
/// back as a [`TransportError`] carrying the captured response, so callers
/// can still decode the error body.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout (30s).
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HuginError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client (shared connection pool, custom TLS).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn invoke(
        &self,
        method: Method,
        url: &str,
        options: TransportOptions,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut request = self.http.request(method.into(), url);

        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?
            .to_vec();

        let captured = TransportResponse {
            status: status.as_u16(),
            headers,
            body,
        };

        if status.is_success() {
            Ok(captured)
        } else {
            Err(TransportError::with_response(
                format!("HTTP {status}"),
                captured,
            ))
        }
    }
}
