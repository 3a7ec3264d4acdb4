//! AWS S3 Signature Version 4 signing.
//!
//! Presigned URL generation for S3-compatible storage services including AWS
//! S3 and Cloudflare R2, using [query string authentication]. Only the
//! read-only subset the gateway needs is implemented: GET and HEAD, unsigned
//! payloads, host-only signed headers.
//!
//! [query string authentication]: https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

/// Default URL expiration: 1 hour.
pub const DEFAULT_EXPIRES: u64 = 3600;

/// AWS S3 credentials for signing requests.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// AWS Access Key ID
    pub access_key_id: String,
    /// AWS Secret Access Key
    pub secret_access_key: String,
}

/// How requests to a bucket are authorized.
#[derive(Debug, Clone)]
pub enum Session {
    /// The bucket is publicly readable; requests go out unsigned.
    Public,

    /// Requests are presigned with the given credentials.
    Authorized {
        /// The signing credentials.
        credentials: Credentials,
        /// The signing region (`"auto"` for R2).
        region: String,
        /// Presigned URL validity in seconds.
        expires: u64,
    },
}

impl Session {
    /// Construct an authorized session.
    pub fn new(credentials: Credentials, region: impl Into<String>, expires: u64) -> Self {
        Session::Authorized {
            credentials,
            region: region.into(),
            expires,
        }
    }

    /// Authorize a request: presign its URL, or pass it through untouched
    /// for a public session.
    pub fn authorize<I: Invocation>(&self, request: &I) -> Result<Authorization, SigningError> {
        match self {
            Session::Public => Ok(Authorization {
                url: request.url().clone(),
                headers: vec![("host".to_string(), host_of(request.url())?)],
            }),
            Session::Authorized {
                credentials,
                region,
                expires,
            } => credentials.authorize(request, region, *expires),
        }
    }
}

/// Request metadata required for signing.
///
/// The time has a real-clock default so that tests can pin it.
pub trait Invocation {
    /// The HTTP method for this request.
    fn method(&self) -> &'static str;

    /// The URL for this request. Its path must already be in canonical
    /// percent-encoded form; [Bucket](crate::Bucket) builds such URLs.
    fn url(&self) -> &Url;

    /// The timestamp for signing. Defaults to the current time.
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An authorization of the request.
#[derive(Debug)]
pub struct Authorization {
    /// The (presigned) URL to request.
    pub url: Url,
    /// Headers that must be included in the HTTP request.
    pub headers: Vec<(String, String)>,
}

/// Errors that can occur during signing.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The endpoint URL is invalid (e.g., missing host).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl Credentials {
    /// Authorize a request with an AWS SigV4 presigned URL.
    ///
    /// Derives the signing key on demand using the request's time. The
    /// signature covers the method, so a URL presigned for GET does not
    /// authorize a HEAD of the same object.
    pub fn authorize<I: Invocation>(
        &self,
        request: &I,
        region: &str,
        expires: u64,
    ) -> Result<Authorization, SigningError> {
        let time = request.time();
        let timestamp = time.format("%Y%m%dT%H%M%SZ").to_string();
        let date = &timestamp[0..8];

        let service = "s3";
        let key = SigningKey::derive(&self.secret_access_key, date, region, service);
        let scope = format!("{}/{}/{}/aws4_request", date, region, service);

        let host = host_of(request.url())?;
        let headers = vec![("host".to_string(), host.clone())];
        let signed_headers = "host";

        let mut query_params: Vec<(String, String)> = vec![
            ("X-Amz-Algorithm".into(), "AWS4-HMAC-SHA256".into()),
            ("X-Amz-Content-Sha256".into(), "UNSIGNED-PAYLOAD".into()),
            (
                "X-Amz-Credential".into(),
                format!("{}/{}", self.access_key_id, scope),
            ),
            ("X-Amz-Date".into(), timestamp.clone()),
            ("X-Amz-Expires".into(), expires.to_string()),
            ("X-Amz-SignedHeaders".into(), signed_headers.into()),
        ];

        // Sort all query parameters alphabetically (required by SigV4)
        query_params.sort_by(|a, b| a.0.cmp(&b.0));

        // The URL path is already canonically encoded, so it is used as the
        // canonical URI verbatim; re-encoding it would corrupt `%XX` escapes.
        let canonical_uri = request.url().path();

        let canonical_query: String = query_params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_headers: String = headers
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n\n{}\nUNSIGNED-PAYLOAD",
            request.method(),
            canonical_uri,
            canonical_query,
            canonical_headers,
            signed_headers
        );

        let digest = Sha256::digest(canonical_request.as_bytes());
        let payload = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            timestamp,
            scope,
            hex::encode(digest)
        );

        let signature = key.sign(payload.as_bytes());

        let mut url = request.url().clone();
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            for (k, v) in &query_params {
                query.append_pair(k, v);
            }
            query.append_pair("X-Amz-Signature", &signature.to_string());
        }

        Ok(Authorization { url, headers })
    }
}

/// The URL's host, including the port when it is non-standard.
fn host_of(url: &Url) -> Result<String, SigningError> {
    let hostname = url
        .host_str()
        .ok_or_else(|| SigningError::InvalidEndpoint("URL missing host".into()))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    })
}

/// AWS SigV4 signing key derived from credentials.
///
/// The key is derived through an HMAC chain:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
#[derive(Debug, Clone)]
struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Derive a signing key using the AWS4 key derivation algorithm.
    fn derive(secret: &str, date: &str, region: &str, service: &str) -> Self {
        let secret = format!("AWS4{}", secret);
        let k_date = Self::hmac(secret.as_bytes(), date.as_bytes());
        let k_region = Self::hmac(&k_date, region.as_bytes());
        let k_service = Self::hmac(&k_region, service.as_bytes());
        Self(Self::hmac(&k_service, b"aws4_request"))
    }

    /// Compute HMAC-SHA256.
    fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any size");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    /// Sign data using this key.
    fn sign(&self, data: &[u8]) -> Signature {
        Signature(Self::hmac(&self.0, data))
    }
}

/// HMAC-SHA256 signature bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature(Vec<u8>);

impl std::fmt::Display for Signature {
    /// Displays hex encoded representation of the signature
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Percent-encode a string according to RFC 3986.
///
/// Unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) are not
/// encoded. All other bytes are encoded as `%XX` where XX is the uppercase
/// hex value.
pub(crate) fn percent_encode(s: &str) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                write!(result, "%{:02X}", byte).expect("writing to a String cannot fail");
            }
        }
    }
    result
}
