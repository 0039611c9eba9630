//! Integration tests for loading [`HuginConfig`] from disk and building a
//! dispatcher from it.

use std::time::Duration;

use hugin::{HuginBuilder, HuginConfig, HuginError};

const FULL_CONFIG: &str = r#"
[client]
host = "https://forum.example.com/"
user_agent = "forum-bot/1.0"
timeout_secs = 10
strict = false
resource_types = ["posts"]

[auth]
token = "file-token"
user_id = 2

[cache]
ttl_secs = 120
max_entries = 50
"#;

#[test]
fn load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = HuginConfig::load(Some(&path)).unwrap();
    assert_eq!(
        config.client.host.as_deref(),
        Some("https://forum.example.com/")
    );
    assert_eq!(config.auth.user_id, Some(2));
    assert_eq!(config.cache.ttl_secs, 120);
}

#[test]
fn load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[client\nhost = ").unwrap();

    let err = HuginConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, HuginError::Configuration(ref msg) if msg.contains("broken.toml")));
}

#[test]
fn builder_from_config_applies_every_section() {
    let config = HuginConfig::from_toml_str(FULL_CONFIG).unwrap();
    let dispatcher = HuginBuilder::from_config(&config).build().unwrap();

    assert_eq!(dispatcher.api_url(), "https://forum.example.com/api/");
    assert!(dispatcher.is_authorized());
    assert!(!dispatcher.is_strict());
    assert!(dispatcher.resource_types().contains("posts"));
    assert_eq!(dispatcher.cache().config().ttl, Duration::from_secs(120));
    assert_eq!(dispatcher.cache().config().max_entries, 50);
    assert!(
        dispatcher
            .headers()
            .contains(&("User-Agent".to_string(), "forum-bot/1.0".to_string()))
    );
    assert!(dispatcher.headers().contains(&(
        "Authorization".to_string(),
        "Token file-token;userId=2".to_string()
    )));
}

#[test]
fn setters_override_config() {
    let config = HuginConfig::from_toml_str(FULL_CONFIG).unwrap();
    let dispatcher = HuginBuilder::from_config(&config)
        .host("https://other.example.com")
        .strict(true)
        .build()
        .unwrap();

    assert_eq!(dispatcher.api_url(), "https://other.example.com/api/");
    assert!(dispatcher.is_strict());
}

#[test]
fn config_without_host_cannot_build() {
    let config = HuginConfig::from_toml_str("[cache]\nttl_secs = 5\n").unwrap();
    let err = HuginBuilder::from_config(&config).build().unwrap_err();
    assert!(matches!(err, HuginError::Configuration(_)));
}
