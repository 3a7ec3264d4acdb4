use crate::{ObjectStore, StorageError};

/// Key prefix under which access tag records are stored.
const TAG_NAMESPACE: &str = ".tags";

/// Suffix appended to the tagged path to form the record key.
const TAG_SUFFIX: &str = ".json";

/// Facade over an [ObjectStore] that reads per-path access tags.
///
/// The tag record for a request path lives at `.tags{path}.json` and holds a
/// JSON array of permission requirements, e.g. `["write", "dist-eu"]`. A path
/// with no record is unclassified, which is not the same as a path with an
/// empty requirement list.
#[derive(Debug, Clone)]
pub struct TagStore<S> {
    store: S,
}

impl<S> TagStore<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key_for(path: &str) -> String {
        format!("{TAG_NAMESPACE}{path}{TAG_SUFFIX}")
    }
}

impl<S: ObjectStore> TagStore<S> {
    /// Fetch the access requirement for a request path, if one is recorded.
    ///
    /// The path is expected in URL form, with its leading slash. Backend
    /// failures and unparseable records are reported as errors; access
    /// decisions must not be made on a record that could not be read.
    pub async fn requirement(&self, path: &str) -> Result<Option<Vec<String>>, StorageError> {
        let object = self
            .store
            .get(&Self::key_for(path))
            .await
            .map_err(|error| StorageError::Backend(format!("{error}")))?;

        let Some(object) = object else {
            return Ok(None);
        };

        let tags = serde_json::from_slice::<Vec<String>>(&object.bytes)
            .map_err(|error| StorageError::CorruptRecord(format!("{error}")))?;

        Ok(Some(tags))
    }
}
