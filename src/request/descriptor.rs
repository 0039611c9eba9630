//! Accumulated request state and its rendering.

use std::fmt;

use serde_json::{Value, json};

use super::{Method, query};
use crate::transport::TransportOptions;

/// Literal path of the token (authentication) endpoint.
pub const TOKEN_ENDPOINT: &str = "token";

/// One component of the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Resource type selector (`discussions`, `users`, ...).
    Type(String),
    /// Resource id.
    Id(u64),
    /// Fixed endpoint name (`token`).
    Literal(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Type(name) | Segment::Literal(name) => f.write_str(name),
            Segment::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Everything accumulated for one logical request.
///
/// `Display` renders the relative path plus query string, e.g.
/// `discussions/5?include=user&page%5Boffset%5D=10`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    pub(crate) method: Method,
    pub(crate) segments: Vec<Segment>,
    pub(crate) includes: Vec<String>,
    pub(crate) query: Vec<(String, Value)>,
    pub(crate) variables: Option<Value>,
}

impl RequestDescriptor {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Query parameters in the order they were first set.
    pub fn query(&self) -> &[(String, Value)] {
        &self.query
    }

    pub fn variables(&self) -> Option<&Value> {
        self.variables.as_ref()
    }

    /// Path segments joined with `/`, without the query string.
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Whether the path is exactly the token endpoint.
    pub fn is_token_endpoint(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Literal(name)] if name == TOKEN_ENDPOINT)
    }

    /// Set a query parameter, replacing an existing key in place.
    pub(crate) fn set_query(&mut self, key: String, value: Value) {
        match self.query.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key, value)),
        }
    }

    /// Payload for the transport.
    ///
    /// GET and HEAD send the variables as query parameters. Every other
    /// verb sends a JSON body wrapped as `{"data": variables}`, except the
    /// token endpoint whose body goes out unwrapped. Empty variables send
    /// nothing.
    pub fn transport_options(&self) -> TransportOptions {
        let mut options = TransportOptions::default();
        let Some(variables) = self.variables.as_ref().filter(|v| !is_empty_payload(v)) else {
            return options;
        };

        if self.method.sends_query() {
            options.query = query::from_variables(variables);
        } else if self.is_token_endpoint() {
            options.json = Some(variables.clone());
        } else {
            options.json = Some(json!({ "data": variables }));
        }
        options
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;

        if !self.includes.is_empty() || !self.query.is_empty() {
            f.write_str("?")?;
        }
        if !self.includes.is_empty() {
            write!(f, "include={}&", self.includes.join(","))?;
        }
        if !self.query.is_empty() {
            let mut pairs = Vec::new();
            for (key, value) in &self.query {
                query::flatten(key, value, &mut pairs);
            }
            f.write_str(&query::encode(&pairs))?;
        }
        Ok(())
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
