#![warn(missing_docs)]

//! The package manifest document model and its per-entry visibility filter.
//!
//! A [Manifest] is a Composer-style package index: a `packages` mapping from
//! package name to a sequence of version entries, each an open-ended record.
//! A version entry may gate its own visibility by carrying a list of
//! permission tokens under `extra["satchel-restrictions"]`; the filter
//! removes the entries a caller is not entitled to see and strips the
//! restriction metadata from those that remain.
//!
//! ```rust
//! use satchel_manifest::Manifest;
//!
//! let manifest = Manifest::from_slice(
//!     br#"{
//!         "packages": {
//!             "acme/widget": [
//!                 { "version": "1.0.0" },
//!                 { "version": "2.0.0-beta", "extra": { "satchel-restrictions": ["beta"] } }
//!             ]
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! // An anonymous caller sees only the unrestricted version.
//! let visible = manifest.filtered(None);
//! let served = String::from_utf8(visible.to_vec_pretty().unwrap()).unwrap();
//!
//! assert!(served.contains("1.0.0"));
//! assert!(!served.contains("2.0.0-beta"));
//! ```

mod document;
mod error;
mod filter;

pub use document::*;
pub use error::*;
