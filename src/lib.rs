//! Hugin - Fluent JSON:API client for Flarum forums
//!
//! This crate composes JSON:API requests through a chained builder, sends
//! them over a pluggable transport and turns the answers into a graph of
//! cached resources whose relationships resolve against each other.
//!
//! # Example
//!
//! ```rust,no_run
//! use hugin::{Hugin, Response};
//!
//! #[tokio::main]
//! async fn main() -> hugin::Result<()> {
//!     let mut forum = Hugin::builder()
//!         .host("https://discuss.example.com")
//!         .token("your-api-token")
//!         .user_id(1)
//!         .build()?;
//!
//!     let response = forum
//!         .discussions()
//!         .id(5)
//!         .include("user")
//!         .get([])?
//!         .request()
//!         .await?;
//!
//!     if let Some(Response::Item(discussion)) = response {
//!         println!("{:?}", discussion.get_str("title"));
//!         if let Some(author) = discussion.related("user") {
//!             println!("by {:?}", author.get_str("username"));
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Writing
//!
//! ```rust,no_run
//! use hugin::{Hugin, Model};
//!
//! # async fn run() -> hugin::Result<()> {
//! let mut forum = Hugin::builder()
//!     .host("https://discuss.example.com")
//!     .token("your-api-token")
//!     .build()?;
//!
//! let mut discussion = Model::new("discussions");
//! discussion.set("title", "Hello");
//! discussion.set("content", "First post");
//! discussion.save(&mut forum).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod request;
pub mod resource;
pub mod response;
pub mod telemetry;
pub mod transport;
pub mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, ResourceCache};
pub use config::HuginConfig;
pub use dispatcher::{Credentials, Dispatcher, Fluent, Hugin, HuginBuilder};
pub use error::{HuginError, Result};
pub use model::Model;
pub use request::{AccessPolicy, Method, RequestBuilder, RequestDescriptor, ResourceTypes};
pub use resource::{Collection, Item, Relation, ResourceIdentifier};
pub use response::{ApiError, Response};
pub use transport::{
    HttpTransport, Transport, TransportError, TransportOptions, TransportResponse,
};
pub use version::PKG_VERSION;
