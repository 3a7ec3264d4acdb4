#![warn(missing_docs)]

//! Identity, permission matching and credential verification for the Satchel
//! gateway.
//!
//! Everything in this crate is pure: no I/O happens here. Callers fetch a
//! [CredentialRecord] from wherever records live, hand it to [verify] along
//! with the [Credentials] presented by the client, and receive an [Identity]
//! or a rejection. An [Identity] carries a [PermissionSet], which answers the
//! one question the rest of the system asks of it: does this set of held
//! tokens satisfy a resource's requirement?
//!
//! ```rust
//! use satchel_auth::PermissionSet;
//!
//! let held = PermissionSet::from_csv("read,dist-*");
//!
//! assert!(held.grants(&["read"]));
//! assert!(held.grants(&["dist-eu"]));
//! assert!(!held.grants(&["admin"]));
//! ```

mod basic;
mod error;
mod identity;
mod permission;
mod record;
mod verifier;

pub use basic::*;
pub use error::*;
pub use identity::*;
pub use permission::*;
pub use record::*;
pub use verifier::*;
