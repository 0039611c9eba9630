//! Single resource object.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{Relation, coerce_id};
use crate::cache::ResourceCache;

/// `(type, id)` pair identifying a resource within its type partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: u64,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: u64) -> Self {
        Self {
            resource_type: resource_type.into(),
            id,
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// One decoded JSON:API resource.
///
/// Items are mutable only while owned; once [`cache`](Item::cache)d they are
/// shared as `Arc<Item>` and treated as immutable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    resource_type: String,
    id: u64,
    attributes: Map<String, Value>,
    relationships: Vec<(String, Relation)>,
}

impl Item {
    /// Create an empty item. Use id `0` for a resource the server has not
    /// assigned an id to yet.
    pub fn new(resource_type: impl Into<String>, id: u64) -> Self {
        Self {
            resource_type: resource_type.into(),
            id,
            ..Default::default()
        }
    }

    /// Build an item from a JSON:API resource object.
    ///
    /// Relationships are resolved by cache lookup only. Anything referenced
    /// but not cached yet resolves to `None`.
    pub fn from_json(value: &Value, cache: &ResourceCache) -> Self {
        let mut item = Self::new(
            value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            coerce_id(value.get("id")),
        );

        if let Some(Value::Object(attributes)) = value.get("attributes") {
            item.attributes = attributes.clone();
        }

        if let Some(Value::Object(relationships)) = value.get("relationships") {
            for (name, relationship) in relationships {
                let relation = Relation::resolve(relationship.get("data"), cache);
                item.relationships.push((name.clone(), relation));
            }
        }

        item
    }

    /// Register this item in the cache under its own type and id.
    pub fn cache(self, cache: &ResourceCache) -> Arc<Item> {
        let item = Arc::new(self);
        cache.insert(Arc::clone(&item));
        item
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.resource_type.clone(), self.id)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Attribute value by name. Unknown attributes yield `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Attribute value as a string slice, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Relationship by name, in the order it appeared in the payload.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relationships
            .iter()
            .find(|(relation_name, _)| relation_name == name)
            .map(|(_, relation)| relation)
    }

    /// Shortcut for a to-one relationship that resolved to a cached item.
    pub fn related(&self, name: &str) -> Option<&Arc<Item>> {
        self.relation(name).and_then(Relation::as_one)
    }

    pub fn relationships(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relationships
            .iter()
            .map(|(name, relation)| (name.as_str(), relation))
    }

    /// Serialize as `{type, id, attributes, relationships}`.
    ///
    /// Relationships are rendered as the *resolved* items, not raw
    /// identifiers. Write requests must send attributes only.
    pub fn to_value(&self) -> Value {
        let relationships: Map<String, Value> = self
            .relationships
            .iter()
            .map(|(name, relation)| (name.clone(), relation.to_value()))
            .collect();

        json!({
            "type": self.resource_type,
            "id": self.id,
            "attributes": self.attributes,
            "relationships": relationships,
        })
    }
}
