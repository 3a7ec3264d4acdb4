#![warn(missing_docs)]

//! Authorization gateway for a Composer package repository.
//!
//! Fronts an object store holding a statically generated package repository
//! and enforces who may see what: accounts are verified against stored
//! credential records, objects under `/dist/` are checked against per-path
//! access tags, and package manifests are filtered down to the version
//! entries the requesting identity is entitled to.
//!
//! ```rust
//! use bytes::Bytes;
//! use http_body_util::Empty;
//! use hyper::Request;
//! use satchel_gateway::{Gateway, GatewaySettings};
//! use satchel_storage::{MemoryObjectStore, Object};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryObjectStore::new();
//! store
//!     .insert("index.html", Object::new("<h1>Satchel</h1>"))
//!     .await;
//!
//! let settings = GatewaySettings {
//!     public_index: true,
//!     ..Default::default()
//! };
//! let gateway = Gateway::new(store, settings);
//!
//! let request = Request::builder().uri("/").body(Empty::<Bytes>::new())?;
//! let response = gateway.handle(request).await;
//!
//! assert_eq!(response.status(), 200);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod policy;
mod response;
mod routes;
mod server;

pub use config::*;
pub use error::*;
pub use policy::*;
pub use routes::*;
pub use server::*;
