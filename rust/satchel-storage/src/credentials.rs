use satchel_auth::CredentialRecord;

use crate::{ObjectStore, StorageError};

/// Key prefix under which credential records are stored.
pub const DEFAULT_CREDENTIAL_PREFIX: &str = ".auth";

/// Facade over an [ObjectStore] that reads credential records.
///
/// A record for the account `alice` lives at `{prefix}/alice` and carries the
/// [CredentialRecord] text format: the secret on the first line, a
/// comma-separated permission list on the second.
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    store: S,
    prefix: String,
}

impl<S> CredentialStore<S> {
    /// Wrap a store, reading records under [DEFAULT_CREDENTIAL_PREFIX].
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: DEFAULT_CREDENTIAL_PREFIX.to_string(),
        }
    }

    /// Read records under a different key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn key_for(&self, name: &str) -> String {
        format!("{}/{}", self.prefix, name)
    }
}

impl<S: ObjectStore> CredentialStore<S> {
    /// Fetch the credential record for an account, if one exists.
    ///
    /// An empty name never resolves to a record. Backend failures and
    /// records that are not valid UTF-8 are reported as errors rather than
    /// treated as absent, so that callers can distinguish "no such account"
    /// from "could not tell".
    pub async fn record(&self, name: &str) -> Result<Option<CredentialRecord>, StorageError> {
        if name.is_empty() {
            return Ok(None);
        }

        let object = self
            .store
            .get(&self.key_for(name))
            .await
            .map_err(|error| StorageError::Backend(format!("{error}")))?;

        let Some(object) = object else {
            return Ok(None);
        };

        let text = String::from_utf8(object.bytes.to_vec())
            .map_err(|error| StorageError::CorruptRecord(format!("{error}")))?;

        Ok(Some(CredentialRecord::parse(&text)))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::{MemoryObjectStore, Object};

    async fn seeded() -> MemoryObjectStore {
        let store = MemoryObjectStore::new();
        store
            .insert(".auth/alice", Object::new("s3cr3t\nread,write"))
            .await;
        store
    }

    #[tokio::test]
    async fn it_fetches_and_parses_a_record() -> anyhow::Result<()> {
        let credentials = CredentialStore::new(seeded().await);
        let record = credentials.record("alice").await?;

        let record = record.ok_or_else(|| anyhow::anyhow!("expected a record"))?;

        assert_eq!(record.secret(), "s3cr3t");
        assert!(record.permissions().grants(&["read", "write"]));
        assert!(!record.permissions().grants(&["admin"]));

        Ok(())
    }

    #[tokio::test]
    async fn it_reports_an_unknown_account_as_absent() -> anyhow::Result<()> {
        let credentials = CredentialStore::new(seeded().await);

        assert!(credentials.record("mallory").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn it_never_resolves_an_empty_name() -> anyhow::Result<()> {
        let store = seeded().await;
        store.insert(".auth/", Object::new("oops\n")).await;

        let credentials = CredentialStore::new(store);

        assert!(credentials.record("").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn it_respects_a_custom_prefix() -> anyhow::Result<()> {
        let store = MemoryObjectStore::new();
        store
            .insert("accounts/bob", Object::new("hunter2\ndist-*"))
            .await;

        let credentials = CredentialStore::new(store).with_prefix("accounts");
        let record = credentials.record("bob").await?;
        let secret = record.map(|record| record.secret().to_string());

        assert_eq!(secret.as_deref(), Some("hunter2"));

        Ok(())
    }

    #[tokio::test]
    async fn it_rejects_a_record_that_is_not_utf8() {
        let store = MemoryObjectStore::new();
        store
            .insert(".auth/alice", Object::new(Bytes::from_static(&[0xFF, 0xFE, 0x00])))
            .await;

        let credentials = CredentialStore::new(store);
        let result = credentials.record("alice").await;

        assert!(matches!(result, Err(StorageError::CorruptRecord(_))));
    }
}
