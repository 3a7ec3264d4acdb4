use serde::Serialize;

use crate::PermissionSet;

/// A verified caller.
///
/// Constructed by [verify] once per request and never persisted; the
/// anonymous case is `Option<Identity>::None` at every consuming call site,
/// so the absence of a caller is always handled explicitly rather than
/// through a sentinel value.
///
/// Serializes to the shape the identity-introspection endpoint returns:
/// `{"name": "alice", "permissions": ["read", "write"]}`.
///
/// [verify]: crate::verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// The name the caller authenticated as.
    pub name: String,

    /// The permission tokens granted to the caller by its credential record.
    pub permissions: PermissionSet,
}

impl Identity {
    /// Construct an identity from a name and its granted permissions.
    pub fn new(name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_serializes_to_the_introspection_shape() -> anyhow::Result<()> {
        let identity = Identity::new("alice", PermissionSet::from_csv("read,write"));

        assert_eq!(
            serde_json::to_string(&identity)?,
            r#"{"name":"alice","permissions":["read","write"]}"#
        );

        Ok(())
    }
}
