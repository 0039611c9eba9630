//! Resource model: decoded JSON:API resources and their relationships.
//!
//! - [`Item`]: one resource object (`type`, `id`, `attributes`,
//!   `relationships`).
//! - [`Collection`]: an ordered list of items with a keyed view by id.
//! - [`Relation`]: a resolved to-one or to-many relationship.
//!
//! Relationships are resolved against the [`ResourceCache`](crate::ResourceCache)
//! while an item is being built. Resolution never fetches: a reference to a
//! resource that is not cached resolves to `None`. The response factory
//! therefore caches the `included` array before it builds primary data.

mod collection;
mod item;
mod relation;

pub use collection::Collection;
pub use item::{Item, ResourceIdentifier};
pub use relation::Relation;

use serde_json::Value;

/// Coerce a JSON:API `id` member to an integer.
///
/// Numbers and numeric strings are accepted; anything else (including an
/// absent id) becomes `0`, the "not yet assigned" id.
pub(crate) fn coerce_id(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_numeric_string() {
        assert_eq!(coerce_id(Some(&json!("42"))), 42);
    }

    #[test]
    fn coerce_number() {
        assert_eq!(coerce_id(Some(&json!(7))), 7);
    }

    #[test]
    fn coerce_absent_or_garbage_is_zero() {
        assert_eq!(coerce_id(None), 0);
        assert_eq!(coerce_id(Some(&json!("abc"))), 0);
        assert_eq!(coerce_id(Some(&json!(null))), 0);
        assert_eq!(coerce_id(Some(&json!(-3))), 0);
    }
}
