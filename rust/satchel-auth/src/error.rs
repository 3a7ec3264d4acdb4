use thiserror::Error;

/// The common error type used by this crate.
///
/// All three variants are ordinary negative outcomes of a credential check,
/// not system failures. They carry no detail about which check failed beyond
/// what their HTTP mapping already reveals: both
/// [AuthError::MissingCredentials] and [AuthError::InvalidCredentials] render
/// as the same challenge response, so an observer cannot separate "unknown
/// user" from "wrong secret".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credentials were presented for a path that requires them
    #[error("Credentials are required")]
    MissingCredentials,

    /// An authorization header was presented but could not be parsed
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// The presented credentials did not verify against any stored record
    #[error("Invalid credentials")]
    InvalidCredentials,
}
