//! Response factory: raw HTTP response → cached resource graph.

use serde_json::Value;
use tracing::trace;

use super::{ApiError, Response};
use crate::Result;
use crate::cache::ResourceCache;
use crate::resource::{Collection, Item};
use crate::transport::TransportResponse;

/// HTTP 204 No Content.
pub const STATUS_NO_CONTENT: u16 = 204;

/// Decode a raw response.
///
/// - 204 → [`Response::NoContent`]
/// - empty body → `None` (or an [`ApiError`] with a `null` body for non-2xx)
/// - non-2xx → [`Response::Error`] with the decoded body
/// - no `data` (or `data: null`) → [`Response::Document`], unchanged
/// - otherwise the `included` array is cached first, then `data` is built
///   into an [`Item`] or [`Collection`] and cached.
///
/// Only a 2xx body that is not valid JSON is an error.
pub fn build(response: &TransportResponse, cache: &ResourceCache) -> Result<Option<Response>> {
    if response.status == STATUS_NO_CONTENT {
        return Ok(Some(Response::NoContent));
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        if response.is_success() {
            return Ok(None);
        }
        return Ok(Some(Response::Error(ApiError::new(
            response.status,
            Value::Null,
        ))));
    }

    if !response.is_success() {
        let body = serde_json::from_slice(&response.body)
            .unwrap_or_else(|_| Value::String(response.text()));
        return Ok(Some(Response::Error(ApiError::new(response.status, body))));
    }

    let document: Value = serde_json::from_slice(&response.body)?;

    let resource = match document.get("data") {
        None | Some(Value::Null) => None,
        Some(data) => {
            store_included(&document, cache);
            cache_data(data, cache)
        }
    };

    Ok(Some(resource.unwrap_or(Response::Document(document))))
}

/// Cache the `included` side-array so primary data can resolve against it.
fn store_included(document: &Value, cache: &ResourceCache) {
    if let Some(included) = document.get("included").and_then(Value::as_array) {
        if !included.is_empty() {
            trace!(count = included.len(), "caching included resources");
            Collection::from_json(included, cache).cache(cache);
        }
    }
}

fn cache_data(data: &Value, cache: &ResourceCache) -> Option<Response> {
    match data {
        Value::Object(object) if object.contains_key("type") => {
            Some(Response::Item(Item::from_json(data, cache).cache(cache)))
        }
        Value::Array(items) => Some(Response::Collection(
            Collection::from_json(items, cache).cache(cache),
        )),
        _ => None,
    }
}
