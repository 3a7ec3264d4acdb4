use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Object, ObjectMeta, StorageError};

use super::ObjectStore;

/// A trivial implementation of [ObjectStore] - backed by a [HashMap] - where
/// all objects are kept in memory and never persisted.
///
/// Cloning shares the underlying map, so a seeded store can be handed to the
/// gateway while the test keeps a handle for further inserts.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    entries: Arc<RwLock<HashMap<String, Object>>>,
}

impl MemoryObjectStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object. The trait surface itself is read-only.
    pub async fn insert(&self, key: impl Into<String>, object: Object) {
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), object);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    type Error = StorageError;

    async fn get(&self, key: &str) -> Result<Option<Object>, Self::Error> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, Self::Error> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(Object::meta))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test]
    async fn it_serves_seeded_objects() -> anyhow::Result<()> {
        let store = MemoryObjectStore::new();
        store
            .insert(
                "dist/widget-1.0.0.zip",
                Object::new(&b"zip bytes"[..]).with_content_type("application/zip"),
            )
            .await;

        let object = store.get("dist/widget-1.0.0.zip").await?.unwrap();

        assert_eq!(object.bytes, Bytes::from_static(b"zip bytes"));
        assert_eq!(object.content_type.as_deref(), Some("application/zip"));

        Ok(())
    }

    #[tokio::test]
    async fn it_reports_absence_as_none() -> anyhow::Result<()> {
        let store = MemoryObjectStore::new();

        assert_eq!(store.get("nope").await?, None);
        assert_eq!(store.head("nope").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn it_answers_head_with_metadata_only() -> anyhow::Result<()> {
        let store = MemoryObjectStore::new();
        store
            .insert("index.html", Object::new(&b"<html/>"[..]).with_content_type("text/html"))
            .await;

        let meta = store.head("index.html").await?.unwrap();

        assert_eq!(meta.content_length, 7);
        assert_eq!(meta.content_type.as_deref(), Some("text/html"));

        Ok(())
    }

    #[tokio::test]
    async fn it_shares_entries_between_clones() -> anyhow::Result<()> {
        let store = MemoryObjectStore::new();
        let handle = store.clone();

        handle.insert("a", Object::new(&b"1"[..])).await;

        assert!(store.get("a").await?.is_some());

        Ok(())
    }
}
