//! Dispatcher: the outward-facing client.
//!
//! A [`Dispatcher`] owns one [`RequestBuilder`], one [`ResourceCache`] and a
//! [`Transport`]. Requests are composed through a [`Fluent`] chain that
//! borrows the dispatcher mutably, which keeps one logical request in
//! flight per dispatcher.

mod builder;
mod fluent;

pub use builder::{Hugin, HuginBuilder};
pub use fluent::Fluent;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::ResourceCache;
use crate::request::{RequestBuilder, ResourceTypes};
use crate::response::{self, Response};
use crate::telemetry;
use crate::transport::{Transport, TransportError};
use crate::{HuginError, Result};

/// `Accept` header sent with every request.
pub const ACCEPT: &str = "application/vnd.api+json, application/json";

/// Token credentials rendered into the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: Option<u64>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, user_id: Option<u64>) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }

    /// `Token <token>`, plus `;userId=<id>` when a user id is known.
    pub fn header_value(&self) -> String {
        match self.user_id {
            Some(user_id) => format!("Token {};userId={user_id}", self.token),
            None => format!("Token {}", self.token),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// JSON:API client owning the request builder, the resource cache and the
/// transport.
pub struct Dispatcher {
    api_url: String,
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
    cache: ResourceCache,
    credentials: Option<Credentials>,
    user_agent: String,
}

impl Dispatcher {
    pub(crate) fn new(
        api_url: String,
        transport: Arc<dyn Transport>,
        builder: RequestBuilder,
        cache: ResourceCache,
        credentials: Option<Credentials>,
        user_agent: String,
    ) -> Self {
        Self {
            api_url,
            transport,
            builder,
            cache,
            credentials,
            user_agent,
        }
    }

    /// Start a chain on the current request state.
    pub fn fluent(&mut self) -> Fluent<'_> {
        Fluent::new(self)
    }

    pub fn discussions(&mut self) -> Fluent<'_> {
        self.fluent().discussions()
    }

    pub fn users(&mut self) -> Fluent<'_> {
        self.fluent().users()
    }

    /// Start a chain with an allow-listed resource type.
    pub fn resource(&mut self, name: &str) -> Result<Fluent<'_>> {
        self.fluent().resource(name)
    }

    /// Post `credentials` to the token endpoint and dispatch immediately.
    ///
    /// The returned [`Response::Document`] holds the token; pass it to
    /// [`authorize`](Self::authorize) to use it.
    pub async fn authenticate(&mut self, credentials: Value) -> Result<Option<Response>> {
        self.fluent().authenticate(credentials).await
    }

    /// Send the accumulated request.
    ///
    /// Any captured response, success or not, goes through the response
    /// factory, so 4xx/5xx bodies come back as [`Response::Error`]. A
    /// transport failure without a response is [`HuginError::Http`].
    ///
    /// The request state is discarded once the transport has been invoked,
    /// whatever the outcome, so token credentials never carry over into
    /// the next chain.
    pub async fn request(&mut self) -> Result<Option<Response>> {
        let descriptor = self.builder.descriptor();
        let method = descriptor.method();
        let path = descriptor.to_string();
        let url = format!("{}{}", self.api_url, path);
        let mut options = descriptor.transport_options();
        options.headers = self.headers();

        debug!(
            transport = self.transport.name(),
            %method,
            %path,
            "dispatching request"
        );

        let started = Instant::now();
        let outcome = self.transport.invoke(method, &url, options).await;
        self.builder.reset();
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method.as_str())
            .record(started.elapsed().as_secs_f64());

        let response = match outcome {
            Ok(response) => response,
            Err(TransportError {
                message,
                response: Some(response),
            }) => {
                debug!(%method, %path, error = %message, "transport raised with a captured response");
                response
            }
            Err(err) => {
                metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method.as_str(), "status" => "failed")
                    .increment(1);
                warn!(%method, %path, error = %err, "request failed without a response");
                return Err(HuginError::Http(err.message));
            }
        };

        let status = if response.is_success() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method.as_str(), "status" => status)
            .increment(1);

        if !response.is_success() {
            warn!(%method, %path, status = response.status, "server returned an error status");
        }

        response::build(&response, &self.cache)
    }

    /// Install a token (and optional user id) and mark the client authorized.
    pub fn authorize(&mut self, token: impl Into<String>, user_id: Option<u64>) -> &mut Self {
        self.credentials = Some(Credentials::new(token, user_id));
        self.builder.policy_mut().authorized = true;
        self
    }

    /// Toggle strict mode (refuse mutating verbs while unauthorized).
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.builder.policy_mut().strict = strict;
        self
    }

    pub fn is_authorized(&self) -> bool {
        self.builder.policy().authorized
    }

    pub fn is_strict(&self) -> bool {
        self.builder.policy().strict
    }

    /// Discard the accumulated request state.
    pub fn reset(&mut self) -> &mut Self {
        self.builder.reset();
        self
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub(crate) fn builder_mut(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }

    pub fn resource_types(&self) -> &ResourceTypes {
        self.builder.resource_types()
    }

    /// Base URL requests are resolved against (`<host>/api/`).
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Accept".to_string(), ACCEPT.to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ];
        if let Some(credentials) = &self.credentials {
            headers.push(("Authorization".to_string(), credentials.header_value()));
        }
        headers
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("api_url", &self.api_url)
            .field("transport", &self.transport.name())
            .field("builder", &self.builder)
            .field("cache", &self.cache)
            .field("credentials", &self.credentials)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
