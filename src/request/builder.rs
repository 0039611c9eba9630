//! Fluent request builder.

use serde_json::Value;
use tracing::trace;

use super::descriptor::{RequestDescriptor, Segment, TOKEN_ENDPOINT};
use super::Method;
use crate::{HuginError, Result};

/// Resource types that are always accepted as type selectors.
pub const BUILTIN_RESOURCE_TYPES: [&str; 2] = ["discussions", "users"];

/// Allow-list of resource type names accepted by
/// [`RequestBuilder::select_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypes {
    names: Vec<String>,
}

impl ResourceTypes {
    /// The built-in types only.
    pub fn new() -> Self {
        Self {
            names: BUILTIN_RESOURCE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add a type name (duplicates are ignored).
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.add(name);
        self
    }

    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ResourceTypes {
    fn default() -> Self {
        Self::new()
    }
}

/// Authorization state consulted before a verb is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// The client carries a token.
    pub authorized: bool,
    /// Refuse mutating verbs while unauthorized. Default: on.
    pub strict: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            authorized: false,
            strict: true,
        }
    }
}

impl AccessPolicy {
    /// Whether `method` may be used under this policy.
    pub fn permits(&self, method: Method) -> bool {
        self.authorized || !self.strict || !method.requires_authorization()
    }
}

/// Accumulates a [`RequestDescriptor`] through chained calls.
///
/// Owned by a [`Dispatcher`](crate::Dispatcher), which resets it after each
/// successful request. Most callers go through [`Fluent`](crate::Fluent)
/// instead of using it directly.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    descriptor: RequestDescriptor,
    policy: AccessPolicy,
    resource_types: ResourceTypes,
}

impl RequestBuilder {
    pub fn new(policy: AccessPolicy, resource_types: ResourceTypes) -> Self {
        Self {
            descriptor: RequestDescriptor::default(),
            policy,
            resource_types,
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    pub(crate) fn policy_mut(&mut self) -> &mut AccessPolicy {
        &mut self.policy
    }

    pub fn resource_types(&self) -> &ResourceTypes {
        &self.resource_types
    }

    /// Append a resource type selector. Only allow-listed names are accepted.
    pub fn select_type(&mut self, name: &str) -> Result<&mut Self> {
        if !self.resource_types.contains(name) {
            return Err(HuginError::UnknownResourceType(name.to_string()));
        }
        self.descriptor.segments.push(Segment::Type(name.to_string()));
        Ok(self)
    }

    pub fn discussions(&mut self) -> &mut Self {
        self.descriptor
            .segments
            .push(Segment::Type("discussions".to_string()));
        self
    }

    pub fn users(&mut self) -> &mut Self {
        self.descriptor
            .segments
            .push(Segment::Type("users".to_string()));
        self
    }

    pub fn id(&mut self, id: u64) -> &mut Self {
        self.descriptor.segments.push(Segment::Id(id));
        self
    }

    /// Add a relation to the `include` parameter. Repeatable; order kept.
    pub fn include(&mut self, name: impl Into<String>) -> &mut Self {
        self.descriptor.includes.push(name.into());
        self
    }

    /// Set `query[key] = value`.
    pub fn paginate(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.descriptor.set_query(key.into(), value.into());
        self
    }

    /// `filter` parameter; an object expands to `filter[name]=value`.
    pub fn filter(&mut self, value: impl Into<Value>) -> &mut Self {
        self.paginate("filter", value)
    }

    /// `page` parameter; an object expands to `page[name]=value`.
    pub fn page(&mut self, value: impl Into<Value>) -> &mut Self {
        self.paginate("page", value)
    }

    /// Shortcut for `paginate("page[offset]", n)`.
    pub fn offset(&mut self, n: u64) -> &mut Self {
        self.paginate("page[offset]", n)
    }

    /// Set the verb from its (case-insensitive) name.
    pub fn set_method(&mut self, verb: &str) -> Result<&mut Self> {
        let method: Method = verb.parse()?;
        self.method(method)
    }

    /// Set the verb, applying the authorization check.
    ///
    /// On failure the descriptor is left untouched.
    pub fn method(&mut self, method: Method) -> Result<&mut Self> {
        self.check_access(method)?;
        trace!(%method, "request method set");
        self.descriptor.method = method;
        Ok(self)
    }

    /// Store variables from a verb call's arguments.
    ///
    /// A single JSON object becomes the variables as-is; any other
    /// non-empty argument list is stored as an array. No arguments leave
    /// the variables unchanged.
    pub fn set_variables(&mut self, arguments: impl IntoIterator<Item = Value>) -> &mut Self {
        let mut arguments: Vec<Value> = arguments.into_iter().collect();
        if arguments.len() == 1 && arguments[0].is_object() {
            self.descriptor.variables = arguments.pop();
        } else if !arguments.is_empty() {
            self.descriptor.variables = Some(Value::Array(arguments));
        }
        self
    }

    pub fn get(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Get, arguments)
    }

    pub fn head(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Head, arguments)
    }

    pub fn post(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Post, arguments)
    }

    pub fn put(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Put, arguments)
    }

    pub fn patch(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Patch, arguments)
    }

    pub fn delete(&mut self, arguments: impl IntoIterator<Item = Value>) -> Result<&mut Self> {
        self.verb(Method::Delete, arguments)
    }

    fn verb(
        &mut self,
        method: Method,
        arguments: impl IntoIterator<Item = Value>,
    ) -> Result<&mut Self> {
        self.check_access(method)?;
        self.set_variables(arguments);
        self.descriptor.method = method;
        Ok(self)
    }

    /// Point the request at the token endpoint with `credentials` as the
    /// unwrapped body. Skips the authorization check: acquiring a token
    /// necessarily happens unauthenticated.
    pub fn prepare_authentication(&mut self, credentials: Value) -> &mut Self {
        self.descriptor.method = Method::Post;
        self.descriptor.segments = vec![Segment::Literal(TOKEN_ENDPOINT.to_string())];
        self.descriptor.variables = Some(credentials);
        self
    }

    /// Discard the accumulated state. Policy and allow-list are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.descriptor = RequestDescriptor::default();
        self
    }

    fn check_access(&self, method: Method) -> Result<()> {
        if self.policy.permits(method) {
            Ok(())
        } else {
            Err(HuginError::UnauthorizedMethod(method))
        }
    }
}
