use satchel_auth::AuthError;
use satchel_manifest::ManifestError;
use satchel_storage::StorageError;
use thiserror::Error;

/// An error that occurs while handling a gateway request.
///
/// Authentication failures map to the 4xx responses of the credential check;
/// everything else is an upstream failure, which surfaces as 502 with a
/// generic body (details go to the log, never to the client).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request's credentials were missing, malformed or wrong.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A backing store could not be read, or returned data that could not
    /// be parsed.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl From<StorageError> for GatewayError {
    fn from(error: StorageError) -> Self {
        GatewayError::Upstream(error.to_string())
    }
}

impl From<ManifestError> for GatewayError {
    fn from(error: ManifestError) -> Self {
        GatewayError::Upstream(error.to_string())
    }
}
