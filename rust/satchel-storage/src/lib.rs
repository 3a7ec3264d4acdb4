#![warn(missing_docs)]

//! Object storage for the Satchel gateway.
//!
//! Every external data source the gateway consults (repository objects,
//! credential records, tag records) sits behind the read-only [ObjectStore]
//! trait. Two backends are provided: [MemoryObjectStore] for tests and local
//! development, and [Bucket] for S3-compatible services (AWS S3, Cloudflare
//! R2), authorized by SigV4 presigned URLs.
//!
//! The [CredentialStore] and [TagStore] facades wrap any backend with the
//! addressing scheme and record parsing for their kind of data:
//!
//! ```rust
//! use satchel_storage::{MemoryObjectStore, Object, TagStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryObjectStore::new();
//! store
//!     .insert(".tags/dist/widget-1.0.0.zip.json", Object::new(br#"["write"]"#.to_vec()))
//!     .await;
//!
//! let tags = TagStore::new(store);
//! let requirement = tags.requirement("/dist/widget-1.0.0.zip").await?;
//!
//! assert_eq!(requirement, Some(vec!["write".to_owned()]));
//! # Ok(())
//! # }
//! ```

mod bucket;
mod credentials;
mod error;
mod memory;
mod sign;
mod store;
mod tags;

pub use bucket::*;
pub use credentials::*;
pub use error::*;
pub use memory::*;
pub use sign::*;
pub use store::*;
pub use tags::*;
