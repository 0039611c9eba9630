//! Builder for configuring dispatcher instances

use std::sync::Arc;
use std::time::Duration;

use super::{Credentials, Dispatcher};
use crate::cache::{CacheConfig, ResourceCache};
use crate::config::HuginConfig;
use crate::request::{AccessPolicy, RequestBuilder, ResourceTypes};
use crate::transport::{HttpTransport, Transport};
use crate::version;
use crate::{HuginError, Result};

/// Main entry point for creating dispatcher instances.
pub struct Hugin;

impl Hugin {
    /// Create a new builder for configuring a dispatcher.
    pub fn builder() -> HuginBuilder {
        HuginBuilder::new()
    }
}

/// Builder for configuring dispatcher instances.
pub struct HuginBuilder {
    host: Option<String>,
    token: Option<String>,
    user_id: Option<u64>,
    strict: bool,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache: CacheConfig,
    resource_types: ResourceTypes,
    transport: Option<Arc<dyn Transport>>,
}

impl HuginBuilder {
    pub fn new() -> Self {
        Self {
            host: None,
            token: None,
            user_id: None,
            strict: true,
            user_agent: None,
            timeout: None,
            cache: CacheConfig::default(),
            resource_types: ResourceTypes::default(),
            transport: None,
        }
    }

    /// Start from a loaded configuration file. Later setter calls override
    /// what the file says.
    pub fn from_config(config: &HuginConfig) -> Self {
        let mut builder = Self::new()
            .strict(config.client.strict)
            .timeout(Duration::from_secs(config.client.timeout_secs))
            .cache(config.cache.to_cache_config());

        builder.host = config.client.host.clone();
        builder.user_agent = config.client.user_agent.clone();
        builder.token = config.auth.token();
        builder.user_id = config.auth.user_id;
        for name in &config.client.resource_types {
            builder.resource_types.add(name.clone());
        }
        builder
    }

    /// Forum root, e.g. `https://example.com/forum`. Requests go to
    /// `<host>/api/`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// API token; its presence marks the dispatcher authorized.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// User id appended to the `Authorization` header as `;userId=<id>`.
    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Refuse mutating verbs without a token (default: on).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Request timeout for the default transport. Ignored when a custom
    /// transport is injected.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resource cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Accept an additional resource type name as a type selector.
    pub fn resource_type(mut self, name: impl Into<String>) -> Self {
        self.resource_types.add(name);
        self
    }

    /// Inject a transport instead of the default reqwest one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Result<Dispatcher> {
        let host = self
            .host
            .ok_or_else(|| HuginError::Configuration("no host configured".to_string()))?;
        let api_url = api_url(&host)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => match self.timeout {
                Some(timeout) => Arc::new(HttpTransport::with_timeout(timeout)?),
                None => Arc::new(HttpTransport::new()?),
            },
        };

        let credentials = self
            .token
            .map(|token| Credentials::new(token, self.user_id));
        let policy = AccessPolicy {
            authorized: credentials.is_some(),
            strict: self.strict,
        };

        Ok(Dispatcher::new(
            api_url,
            transport,
            RequestBuilder::new(policy, self.resource_types),
            ResourceCache::new(&self.cache),
            credentials,
            self.user_agent.unwrap_or_else(version::user_agent),
        ))
    }
}

impl Default for HuginBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the host and derive the API base URL (`<host>/api/`).
fn api_url(host: &str) -> Result<String> {
    let parsed = url::Url::parse(host)
        .map_err(|e| HuginError::Configuration(format!("invalid host '{host}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HuginError::Configuration(format!(
            "unsupported scheme '{}' in host '{host}'",
            parsed.scheme()
        )));
    }
    Ok(format!("{}/api/", host.trim_end_matches('/')))
}
