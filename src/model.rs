//! Writable models over decoded resources.
//!
//! An [`Item`] is a read-only node of the cached graph. A [`Model`] is the
//! mutable counterpart used to create, update or delete one resource:
//! only its type, id and attributes travel back to the server.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::request::ResourceTypes;
use crate::resource::Item;
use crate::response::Response;
use crate::{HuginError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    resource_type: String,
    id: Option<u64>,
    attributes: Map<String, Value>,
}

impl Model {
    /// A model the server has not stored yet.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Convert a decoded item. Its type must be one the client can address.
    pub fn from_item(item: &Item, resource_types: &ResourceTypes) -> Result<Self> {
        if !resource_types.contains(item.resource_type()) {
            return Err(HuginError::UnresolvableResourceType(
                item.resource_type().to_string(),
            ));
        }
        Ok(Self {
            resource_type: item.resource_type().to_string(),
            id: (item.id() != 0).then_some(item.id()),
            attributes: item.attributes().clone(),
        })
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Item carrying the type, the attributes and the id when known.
    /// Relationships are not carried over.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new(self.resource_type.clone(), self.id.unwrap_or_default());
        for (name, value) in &self.attributes {
            item.set(name.clone(), value.clone());
        }
        item
    }

    /// Resource object sent by [`save`](Self::save).
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "type": self.resource_type,
            "attributes": self.attributes,
        });
        if let Some(id) = self.id {
            payload["id"] = Value::String(id.to_string());
        }
        payload
    }

    /// Create (`POST <type>`) or update (`PATCH <type>/<id>`) the resource.
    ///
    /// Any request state already accumulated on the dispatcher is discarded
    /// first.
    pub async fn save(&self, dispatcher: &mut Dispatcher) -> Result<Option<Response>> {
        dispatcher.reset();
        let chain = dispatcher.resource(&self.resource_type)?;
        let chain = match self.id {
            Some(id) => {
                debug!(resource_type = %self.resource_type, id, "updating resource");
                chain.id(id).patch([self.payload()])?
            }
            None => {
                debug!(resource_type = %self.resource_type, "creating resource");
                chain.post([self.payload()])?
            }
        };
        chain.request().await
    }

    /// `DELETE <type>/<id>`. A model without an id is refused before any
    /// request is made.
    pub async fn delete(&self, dispatcher: &mut Dispatcher) -> Result<Option<Response>> {
        let id = self.id.ok_or(HuginError::MissingResourceIdentifier)?;
        dispatcher.reset();
        debug!(resource_type = %self.resource_type, id, "deleting resource");
        dispatcher
            .resource(&self.resource_type)?
            .id(id)
            .delete([])?
            .request()
            .await
    }
}
