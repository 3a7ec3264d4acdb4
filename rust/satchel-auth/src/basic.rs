use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::AuthError;

/// The name/secret pair presented by a client.
///
/// Parsed out of an HTTP Basic `Authorization` header with
/// [Credentials::from_basic]; whether the pair actually names anyone is the
/// verifier's business, so an empty name or secret parses fine here and is
/// rejected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The name the client claims.
    pub name: String,

    /// The secret presented alongside the name.
    pub secret: String,
}

impl Credentials {
    /// Construct a credential pair directly.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }

    /// Parse the value of an `Authorization` header using the Basic scheme.
    ///
    /// The scheme is matched case-sensitively. The payload must be standard
    /// base64 over UTF-8 text containing a `:`; the split happens at the
    /// first `:`, so secrets may themselves contain colons. Anything else is
    /// [AuthError::MalformedHeader].
    pub fn from_basic(header: &str) -> Result<Self, AuthError> {
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or(AuthError::MalformedHeader)?;
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| AuthError::MalformedHeader)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;
        let (name, secret) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedHeader)?;

        Ok(Self::new(name, secret))
    }

    /// Render this pair as a Basic `Authorization` header value.
    pub fn to_basic(&self) -> String {
        let payload = format!("{}:{}", self.name, self.secret);

        format!("Basic {}", STANDARD.encode(payload))
    }
}
