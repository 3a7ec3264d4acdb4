use satchel_auth::Identity;
use satchel_storage::{ObjectStore, TagStore};

use crate::GatewayError;

/// Outcome of an access-policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The identity holds a permission satisfying the path's requirement.
    Granted,
    /// The request must not be served. The reason is carried for logging;
    /// every denial renders as the same forbidden response.
    Denied(Denial),
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No tag record exists for the path. An unclassified resource is never
    /// implicitly public.
    Undetermined,
    /// The path is classified but the request carries no identity.
    Anonymous,
    /// The identity's permissions do not satisfy the requirement.
    NotEntitled,
}

/// Decide whether `identity` may access the object at `path`.
///
/// The requirement comes from the tag store; a missing record, a missing
/// identity and an unsatisfied requirement are all denials, in that order of
/// precedence. A tag store that cannot be read is an error; failures are
/// never converted into either a denial or a grant.
pub async fn authorize<S: ObjectStore>(
    tags: &TagStore<S>,
    path: &str,
    identity: Option<&Identity>,
) -> Result<Access, GatewayError> {
    let Some(requirement) = tags.requirement(path).await? else {
        return Ok(Access::Denied(Denial::Undetermined));
    };

    let Some(identity) = identity else {
        return Ok(Access::Denied(Denial::Anonymous));
    };

    if identity.permissions.grants(&requirement) {
        Ok(Access::Granted)
    } else {
        Ok(Access::Denied(Denial::NotEntitled))
    }
}

#[cfg(test)]
mod tests {
    use satchel_auth::PermissionSet;
    use satchel_storage::{MemoryObjectStore, Object};

    use super::*;

    async fn tag_store() -> TagStore<MemoryObjectStore> {
        let store = MemoryObjectStore::new();
        store
            .insert(
                ".tags/dist/widget-1.0.0.zip.json",
                Object::new(r#"["write"]"#),
            )
            .await;
        store
            .insert(".tags/dist/open.zip.json", Object::new("[]"))
            .await;
        store
            .insert(".tags/dist/corrupt.zip.json", Object::new("not json"))
            .await;
        TagStore::new(store)
    }

    fn identity(csv: &str) -> Identity {
        Identity::new("alice", PermissionSet::from_csv(csv))
    }

    #[tokio::test]
    async fn it_grants_a_matching_identity() -> anyhow::Result<()> {
        let tags = tag_store().await;
        let alice = identity("read,write");

        let access = authorize(&tags, "/dist/widget-1.0.0.zip", Some(&alice)).await?;

        assert_eq!(access, Access::Granted);

        Ok(())
    }

    #[tokio::test]
    async fn it_denies_an_identity_without_the_permission() -> anyhow::Result<()> {
        let tags = tag_store().await;
        let alice = identity("read");

        let access = authorize(&tags, "/dist/widget-1.0.0.zip", Some(&alice)).await?;

        assert_eq!(access, Access::Denied(Denial::NotEntitled));

        Ok(())
    }

    #[tokio::test]
    async fn it_denies_an_unclassified_path() -> anyhow::Result<()> {
        let tags = tag_store().await;
        let alice = identity("*");

        let access = authorize(&tags, "/dist/unknown.zip", Some(&alice)).await?;

        assert_eq!(access, Access::Denied(Denial::Undetermined));

        Ok(())
    }

    #[tokio::test]
    async fn it_denies_anonymous_requests() -> anyhow::Result<()> {
        let tags = tag_store().await;

        let access = authorize(&tags, "/dist/widget-1.0.0.zip", None).await?;

        assert_eq!(access, Access::Denied(Denial::Anonymous));

        Ok(())
    }

    #[tokio::test]
    async fn it_grants_any_identity_an_empty_requirement() -> anyhow::Result<()> {
        let tags = tag_store().await;
        let alice = identity("nothing-relevant");

        let access = authorize(&tags, "/dist/open.zip", Some(&alice)).await?;

        assert_eq!(access, Access::Granted);

        Ok(())
    }

    #[tokio::test]
    async fn it_grants_the_universal_permission() -> anyhow::Result<()> {
        let tags = tag_store().await;
        let root = identity("*");

        let access = authorize(&tags, "/dist/widget-1.0.0.zip", Some(&root)).await?;

        assert_eq!(access, Access::Granted);

        Ok(())
    }

    #[tokio::test]
    async fn it_propagates_a_corrupt_record_as_an_error() {
        let tags = tag_store().await;
        let alice = identity("*");

        let result = authorize(&tags, "/dist/corrupt.zip", Some(&alice)).await;

        assert!(matches!(result, Err(GatewayError::Upstream(_))));
    }
}
