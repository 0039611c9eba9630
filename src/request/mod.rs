//! Request building.
//!
//! A [`RequestBuilder`] accumulates a [`RequestDescriptor`] (verb, path
//! segments, includes, query, variables) through chained calls and renders
//! it to a relative path plus query string:
//!
//! ```text
//! discussions/5?include=user,posts&page%5Boffset%5D=10
//! ```
//!
//! Mutating verbs are checked against the [`AccessPolicy`] when they are
//! set, so a refused request fails before anything reaches the transport.

mod builder;
mod descriptor;
mod method;
pub(crate) mod query;

pub use builder::{AccessPolicy, BUILTIN_RESOURCE_TYPES, RequestBuilder, ResourceTypes};
pub use descriptor::{RequestDescriptor, Segment, TOKEN_ENDPOINT};
pub use method::Method;
