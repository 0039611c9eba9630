//! Resolved relationships.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Item, coerce_id};
use crate::cache::ResourceCache;

/// A relationship after cache resolution.
///
/// Unresolved references (never cached, or expired) are kept as `None` so
/// the shape of the relationship is preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// To-one relationship.
    One(Option<Arc<Item>>),
    /// To-many relationship, keyed by the referenced id in payload order.
    /// A repeated id overwrites the earlier entry in place.
    Many(Vec<(u64, Option<Arc<Item>>)>),
}

impl Relation {
    /// Resolve a relationship `data` member against the cache.
    ///
    /// An object with a `type` is a to-one reference, an array is a list of
    /// to-many references. Anything else (`null`, absent) is an empty
    /// to-one relationship.
    pub(crate) fn resolve(data: Option<&Value>, cache: &ResourceCache) -> Self {
        match data {
            Some(reference @ Value::Object(_)) if has_type(reference) => {
                Relation::One(lookup(reference, cache))
            }
            Some(Value::Array(references)) => {
                let mut resolved: Vec<(u64, Option<Arc<Item>>)> =
                    Vec::with_capacity(references.len());
                for reference in references {
                    let id = coerce_id(reference.get("id"));
                    let item = lookup(reference, cache);
                    match resolved.iter_mut().find(|(existing, _)| *existing == id) {
                        Some(slot) => slot.1 = item,
                        None => resolved.push((id, item)),
                    }
                }
                Relation::Many(resolved)
            }
            _ => Relation::One(None),
        }
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self, Relation::One(_))
    }

    /// The resolved item of a to-one relationship.
    pub fn as_one(&self) -> Option<&Arc<Item>> {
        match self {
            Relation::One(item) => item.as_ref(),
            Relation::Many(_) => None,
        }
    }

    /// Entry of a to-many relationship by referenced id.
    ///
    /// Also matches a to-one relationship whose resolved item has that id.
    pub fn get(&self, id: u64) -> Option<&Arc<Item>> {
        match self {
            Relation::One(item) => item.as_ref().filter(|item| item.id() == id),
            Relation::Many(items) => items
                .iter()
                .find(|(entry, _)| *entry == id)
                .and_then(|(_, item)| item.as_ref()),
        }
    }

    /// Referenced ids, resolved or not, in payload order.
    pub fn ids(&self) -> Vec<u64> {
        match self {
            Relation::One(item) => item.iter().map(|item| item.id()).collect(),
            Relation::Many(items) => items.iter().map(|(id, _)| *id).collect(),
        }
    }

    /// Only the items that resolved.
    pub fn resolved(&self) -> impl Iterator<Item = &Arc<Item>> {
        let items: Vec<&Arc<Item>> = match self {
            Relation::One(item) => item.iter().collect(),
            Relation::Many(items) => items.iter().filter_map(|(_, item)| item.as_ref()).collect(),
        };
        items.into_iter()
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Relation::One(Some(item)) => item.to_value(),
            Relation::One(None) => Value::Null,
            Relation::Many(items) => {
                let map: Map<String, Value> = items
                    .iter()
                    .map(|(id, item)| {
                        let value = item.as_ref().map_or(Value::Null, |item| item.to_value());
                        (id.to_string(), value)
                    })
                    .collect();
                Value::Object(map)
            }
        }
    }
}

fn has_type(reference: &Value) -> bool {
    reference
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty())
}

fn lookup(reference: &Value, cache: &ResourceCache) -> Option<Arc<Item>> {
    let resource_type = reference.get("type").and_then(Value::as_str)?;
    cache.get(coerce_id(reference.get("id")), resource_type)
}
