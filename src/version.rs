//! Version information.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default `User-Agent` header value: `{name}/{version}`.
///
/// Example: `hugin/0.1.0`
pub fn user_agent() -> String {
    format!("{PKG_NAME}/{PKG_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_contains_pkg_version() {
        let agent = user_agent();
        assert!(
            agent.ends_with(PKG_VERSION),
            "user agent should end with pkg version"
        );
    }

    #[test]
    fn user_agent_starts_with_name() {
        assert!(user_agent().starts_with("hugin/"));
    }
}
