//! Chained request composition.

use serde_json::Value;

use super::Dispatcher;
use crate::cache::ResourceCache;
use crate::request::RequestDescriptor;
use crate::response::Response;
use crate::Result;

/// Chain handle over a dispatcher's request state.
///
/// Every call mutates the dispatcher's [`RequestBuilder`](crate::RequestBuilder)
/// and hands the chain back; verb calls and [`resource`](Self::resource)
/// return `Result` because they can be refused locally. Dispatcher-level
/// operations are forwarded explicitly ([`request`](Self::request),
/// [`authenticate`](Self::authenticate), [`is_authorized`](Self::is_authorized),
/// [`is_strict`](Self::is_strict), [`cache`](Self::cache)).
///
/// ```rust,no_run
/// # async fn run(client: &mut hugin::Dispatcher) -> hugin::Result<()> {
/// let response = client
///     .discussions()
///     .id(5)
///     .include("user")
///     .include("posts")
///     .get([])?
///     .request()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Fluent<'a> {
    dispatcher: &'a mut Dispatcher,
}

impl<'a> Fluent<'a> {
    pub(crate) fn new(dispatcher: &'a mut Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn discussions(self) -> Self {
        self.dispatcher.builder_mut().discussions();
        self
    }

    pub fn users(self) -> Self {
        self.dispatcher.builder_mut().users();
        self
    }

    /// Select an allow-listed resource type.
    pub fn resource(self, name: &str) -> Result<Self> {
        self.dispatcher.builder_mut().select_type(name)?;
        Ok(self)
    }

    pub fn id(self, id: u64) -> Self {
        self.dispatcher.builder_mut().id(id);
        self
    }

    pub fn include(self, name: impl Into<String>) -> Self {
        self.dispatcher.builder_mut().include(name);
        self
    }

    pub fn paginate(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dispatcher.builder_mut().paginate(key, value);
        self
    }

    pub fn filter(self, value: impl Into<Value>) -> Self {
        self.dispatcher.builder_mut().filter(value);
        self
    }

    pub fn page(self, value: impl Into<Value>) -> Self {
        self.dispatcher.builder_mut().page(value);
        self
    }

    pub fn offset(self, n: u64) -> Self {
        self.dispatcher.builder_mut().offset(n);
        self
    }

    /// Set the verb by name (case-insensitive).
    pub fn method(self, verb: &str) -> Result<Self> {
        self.dispatcher.builder_mut().set_method(verb)?;
        Ok(self)
    }

    pub fn get(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().get(arguments)?;
        Ok(self)
    }

    pub fn head(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().head(arguments)?;
        Ok(self)
    }

    pub fn post(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().post(arguments)?;
        Ok(self)
    }

    pub fn put(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().put(arguments)?;
        Ok(self)
    }

    pub fn patch(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().patch(arguments)?;
        Ok(self)
    }

    pub fn delete(self, arguments: impl IntoIterator<Item = Value>) -> Result<Self> {
        self.dispatcher.builder_mut().delete(arguments)?;
        Ok(self)
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        self.dispatcher.builder().descriptor()
    }

    /// Rendered relative path with query string.
    pub fn path(&self) -> String {
        self.descriptor().to_string()
    }

    pub fn is_authorized(&self) -> bool {
        self.dispatcher.is_authorized()
    }

    pub fn is_strict(&self) -> bool {
        self.dispatcher.is_strict()
    }

    pub fn cache(&self) -> &ResourceCache {
        self.dispatcher.cache()
    }

    /// Dispatch the accumulated request. See [`Dispatcher::request`].
    pub async fn request(self) -> Result<Option<Response>> {
        self.dispatcher.request().await
    }

    /// Replace the request with a token request and dispatch it at once.
    pub async fn authenticate(self, credentials: Value) -> Result<Option<Response>> {
        self.dispatcher
            .builder_mut()
            .prepare_authentication(credentials);
        self.dispatcher.request().await
    }
}
