use thiserror::Error;

/// The common error type used by this crate.
///
/// Absence of an object is never an error (stores report it as `Ok(None)`);
/// these variants are the genuine failures, which the gateway surfaces as an
/// upstream fault rather than folding into an authorization denial.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An error that occurs when a storage backend cannot be reached or
    /// rejects an operation
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// An error that occurs when stored data cannot be parsed
    #[error("Stored record is corrupt: {0}")]
    CorruptRecord(String),

    /// An error that occurs when a key cannot be rendered into a request URL
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        StorageError::Backend(error.to_string())
    }
}
