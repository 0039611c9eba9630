//! Decoded responses.
//!
//! [`build`] turns a raw [`TransportResponse`](crate::transport::TransportResponse)
//! into a [`Response`]: cached resources for JSON:API documents, the decoded
//! body for anything else, and [`ApiError`] for non-2xx answers.

mod factory;

pub use factory::{STATUS_NO_CONTENT, build};

use std::sync::Arc;

use serde_json::Value;

use crate::resource::{Collection, Item};

/// Outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 204 No Content.
    NoContent,
    /// `data` was a single resource object (now cached).
    Item(Arc<Item>),
    /// `data` was an array of resource objects (now cached).
    Collection(Collection),
    /// Body without JSON:API `data`, returned as decoded (e.g. the token
    /// endpoint's `{"token": ..., "userId": ...}`).
    Document(Value),
    /// The server answered outside the 2xx range.
    Error(ApiError),
}

impl Response {
    pub fn is_no_content(&self) -> bool {
        matches!(self, Response::NoContent)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    pub fn as_item(&self) -> Option<&Arc<Item>> {
        match self {
            Response::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn into_item(self) -> Option<Arc<Item>> {
        match self {
            Response::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Response::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Response::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Response::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            Response::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// A non-2xx answer, carried as data rather than raised.
///
/// `body` is the decoded JSON when the server sent JSON, the raw text as a
/// JSON string otherwise, and `null` when the body was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub body: Value,
}

impl ApiError {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Entries of a JSON:API `errors` array (empty if there is none).
    pub fn errors(&self) -> &[Value] {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `detail` (or else `title`, or else `code`) of the first error entry.
    pub fn message(&self) -> Option<&str> {
        let first = self.errors().first()?;
        ["detail", "title", "code"]
            .iter()
            .find_map(|key| first.get(*key).and_then(Value::as_str))
    }
}
