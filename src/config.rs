//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. an explicit path
//! 2. `~/.hugin/config.toml` (user)
//! 3. `/etc/hugin/config.toml` (system)
//!
//! The API token may be left out of the file and provided through the
//! `HUGIN_TOKEN` environment variable instead.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::{HuginError, Result};

/// Environment variable consulted when `[auth] token` is absent.
pub const TOKEN_ENV_VAR: &str = "HUGIN_TOKEN";

/// Client configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuginConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Forum root URL; requests go to `<host>/api/`.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Refuse mutating verbs without a token (default: true).
    #[serde(default = "default_strict")]
    pub strict: bool,
    /// Extra resource type names accepted by type selectors.
    #[serde(default)]
    pub resource_types: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            user_agent: None,
            timeout_secs: default_timeout(),
            strict: default_strict(),
            resource_types: Vec::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_strict() -> bool {
    true
}

#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

impl AuthConfig {
    /// Token from the file, falling back to `HUGIN_TOKEN`.
    pub fn token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|token| !token.is_empty())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Resource cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Time-to-live of cached resources in seconds (default: 3600).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Maximum entries per type partition (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    10_000
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .ttl(Duration::from_secs(self.ttl_secs))
            .max_entries(self.max_entries)
    }
}

impl HuginConfig {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.hugin/config.toml`
    /// 3. `/etc/hugin/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            HuginError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            HuginError::Configuration(msg) => {
                HuginError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| HuginError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(HuginError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".hugin").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/hugin/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(HuginError::Configuration(
            "No config file found. Create ~/.hugin/config.toml or /etc/hugin/config.toml"
                .to_string(),
        ))
    }
}
