//! Ordered list of resources with a keyed view by id.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::Item;
use crate::cache::ResourceCache;

/// Resources decoded from a JSON:API array (`data` or `included`).
///
/// Built in one keyed pass: when two elements share an id, the later one
/// replaces the earlier one at the earlier one's position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<Arc<Item>>,
    index: HashMap<u64, usize>,
}

impl Collection {
    /// Build a collection from a JSON:API array, resolving each element's
    /// relationships against the cache (read only).
    pub fn from_json(data: &[Value], cache: &ResourceCache) -> Self {
        Self::from_items(
            data.iter()
                .map(|value| Arc::new(Item::from_json(value, cache))),
        )
    }

    /// Build a collection from already constructed items.
    pub fn from_items(items: impl IntoIterator<Item = Arc<Item>>) -> Self {
        let mut collection = Self::default();
        for item in items {
            collection.push(item);
        }
        collection
    }

    fn push(&mut self, item: Arc<Item>) {
        match self.index.get(&item.id()) {
            Some(&position) => self.items[position] = item,
            None => {
                self.index.insert(item.id(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// Register every item in the cache.
    pub fn cache(self, cache: &ResourceCache) -> Self {
        for item in &self.items {
            cache.insert(Arc::clone(item));
        }
        self
    }

    /// Item by id.
    pub fn get(&self, id: u64) -> Option<&Arc<Item>> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Item>> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(|item| item.id()).collect()
    }

    pub fn first(&self) -> Option<&Arc<Item>> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by attribute `by`, greatest first, optionally limited
    /// to the first `amount`.
    ///
    /// The order is descending so that `latest("createdAt", Some(n))` yields
    /// the `n` newest items. For ascending order, sort [`iter`](Self::iter)
    /// yourself.
    ///
    /// Numbers compare numerically, strings lexically (so ISO-8601
    /// timestamps sort chronologically). Items missing the attribute go
    /// last; ties keep collection order.
    pub fn latest(&self, by: &str, amount: Option<usize>) -> Vec<Arc<Item>> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| compare_attribute(b.get(by), a.get(by)));
        if let Some(amount) = amount {
            items.truncate(amount);
        }
        items
    }

    /// Serialize every item with [`Item::to_value`].
    pub fn to_value(&self) -> Value {
        Value::Array(self.items.iter().map(|item| item.to_value()).collect())
    }
}

impl IntoIterator for Collection {
    type Item = Arc<Item>;
    type IntoIter = std::vec::IntoIter<Arc<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Arc<Item>;
    type IntoIter = std::slice::Iter<'a, Arc<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Order two attribute values; absent and `null` sort lowest.
fn compare_attribute(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
