use async_trait::async_trait;
use bytes::Bytes;

/// A stored object: its payload plus the metadata needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// The object payload.
    pub bytes: Bytes,

    /// The stored content type, if the backend knows one.
    pub content_type: Option<String>,
}

impl Object {
    /// Construct an object from its payload, with no content type.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The metadata view of this object, as a HEAD of it would report.
    pub fn meta(&self) -> ObjectMeta {
        ObjectMeta {
            content_length: self.bytes.len() as u64,
            content_type: self.content_type.clone(),
        }
    }
}

/// Object metadata, as reported without transferring the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Size of the payload in bytes.
    pub content_length: u64,

    /// The stored content type, if the backend knows one.
    pub content_type: Option<String>,
}

/// A read-only, key-addressed object store.
///
/// The gateway never writes through this trait; seeding is a backend
/// concern. Absence of a key is the ordinary `Ok(None)` outcome. Errors are
/// reserved for the store itself failing, which callers must treat as a
/// fault, never as "not found" and never as permission to proceed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// The error produced when this store fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the object at `key`.
    async fn get(&self, key: &str) -> Result<Option<Object>, Self::Error>;

    /// Fetch only the metadata of the object at `key`.
    ///
    /// The default transfers the payload and discards it; backends with a
    /// cheaper probe override this.
    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, Self::Error> {
        Ok(self.get(key).await?.map(|object| object.meta()))
    }
}
