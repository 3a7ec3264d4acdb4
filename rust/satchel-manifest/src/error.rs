use thiserror::Error;

/// The common error type used by this crate.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An error that occurs when stored manifest bytes cannot be parsed
    #[error("Failed to parse a manifest: {0}")]
    ParseFailed(String),

    /// An error that occurs when a manifest cannot be serialized
    #[error("Failed to serialize a manifest: {0}")]
    SerializeFailed(String),
}
