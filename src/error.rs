//! Hugin error types

use crate::request::Method;

/// Hugin error types
///
/// Server-side failures (4xx/5xx with a body) are not errors: they come back
/// as [`Response::Error`](crate::Response::Error) so callers can handle them
/// the same way as successful payloads.
#[derive(Debug, thiserror::Error)]
pub enum HuginError {
    // Request building errors
    /// A mutating verb was requested without authorization in strict mode.
    /// Raised locally, nothing is sent over the wire.
    #[error("method '{0}' requires an authorized client")]
    UnauthorizedMethod(Method),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    // Model mapping errors
    #[error("resource type '{0}' could not be mapped to a model")]
    UnresolvableResourceType(String),

    #[error("resource has no identifier")]
    MissingResourceIdentifier,

    // Transport errors
    /// The transport failed without capturing any response.
    #[error("HTTP error: {0}")]
    Http(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginError {
    /// Whether this error was raised before anything was dispatched.
    ///
    /// Local errors are contract violations of the request builder or the
    /// model mapper; retrying the same call cannot succeed.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            HuginError::UnauthorizedMethod(_)
                | HuginError::UnsupportedMethod(_)
                | HuginError::UnknownResourceType(_)
                | HuginError::UnresolvableResourceType(_)
                | HuginError::MissingResourceIdentifier
                | HuginError::Configuration(_)
        )
    }
}

/// Result type alias for Hugin operations
pub type Result<T> = std::result::Result<T, HuginError>;
