use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::sign::percent_encode;
use crate::{
    Authorization, Invocation, Object, ObjectMeta, ObjectStore, Session, SigningError,
    StorageError,
};

/// A GET request to retrieve an object.
#[derive(Debug, Clone)]
struct Get {
    url: Url,
}

impl Invocation for Get {
    fn method(&self) -> &'static str {
        "GET"
    }

    fn url(&self) -> &Url {
        &self.url
    }
}

/// A HEAD request to probe an object.
#[derive(Debug, Clone)]
struct Head {
    url: Url,
}

impl Invocation for Head {
    fn method(&self) -> &'static str {
        "HEAD"
    }

    fn url(&self) -> &Url {
        &self.url
    }
}

/// Executable bucket request.
///
/// Extends [Invocation] with the ability to run the request against a
/// [Bucket]; the split keeps the signing module free of HTTP-client
/// concerns.
trait Request: Invocation + Sized {
    /// Perform this request against the given bucket.
    async fn perform(&self, bucket: &Bucket) -> Result<reqwest::Response, StorageError> {
        let Authorization { url, headers } = bucket
            .session
            .authorize(self)
            .map_err(|error: SigningError| StorageError::Backend(error.to_string()))?;

        let mut builder = match self.method() {
            "HEAD" => bucket.client.head(url),
            _ => bucket.client.get(url),
        };

        for (key, value) in headers {
            builder = builder.header(key, value);
        }

        Ok(builder.send().await?)
    }
}

impl Request for Get {}
impl Request for Head {}

/// S3/R2-compatible object store.
///
/// Objects are addressed as `{endpoint}/{bucket}/{key}` with every key
/// segment percent-encoded, and requests are presigned per the bucket's
/// [Session]. Only reads are implemented; seeding the repository is a
/// deployment concern, not the gateway's.
///
/// # Example
///
/// ```no_run
/// use satchel_storage::{Bucket, Credentials, Session};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials {
///     access_key_id: std::env::var("AWS_ACCESS_KEY_ID")?,
///     secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY")?,
/// };
///
/// let bucket = Bucket::open(
///     "https://YOUR_ACCOUNT_ID.r2.cloudflarestorage.com",
///     "satchel",
///     Session::new(credentials, "auto", 3600),
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Bucket {
    /// Base endpoint URL (e.g., "https://s3.region.amazonaws.com")
    endpoint: String,
    /// Bucket name
    bucket: String,
    /// Session for authorizing requests
    session: Session,
    /// HTTP client
    client: reqwest::Client,
}

impl Bucket {
    /// Create a new bucket store.
    ///
    /// Use [Session::Public] for unsigned access to a public bucket, or
    /// [Session::new] for presigned requests.
    pub fn open(endpoint: impl Into<String>, bucket: impl Into<String>, session: Session) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            session,
            client: reqwest::Client::new(),
        }
    }

    /// Build the URL for a given key.
    ///
    /// Each `/`-separated segment is percent-encoded, which also leaves the
    /// URL path in the canonical form SigV4 signs over. A key with a `.`,
    /// `..` or empty segment is invalid.
    fn url(&self, key: &str) -> Result<Url, StorageError> {
        // `Url::parse` folds `.` and `..` steps into the surrounding path;
        // a key holding one would address a different object.
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "{key}: dot or empty segment"
            )));
        }

        let encoded_key = key
            .split('/')
            .map(percent_encode)
            .collect::<Vec<_>>()
            .join("/");

        let base_url = self.endpoint.trim_end_matches('/');
        let url_str = format!("{base_url}/{}/{encoded_key}", self.bucket);

        Url::parse(&url_str)
            .map_err(|error| StorageError::InvalidKey(format!("{key}: {error}")))
    }
}

#[async_trait]
impl ObjectStore for Bucket {
    type Error = StorageError;

    async fn get(&self, key: &str) -> Result<Option<Object>, Self::Error> {
        let url = self.url(key)?;
        let response = Get { url }.perform(self).await?;
        let status = response.status();

        if status.is_success() {
            let content_type = content_type_of(&response);
            let bytes = response.bytes().await?;

            let mut object = Object::new(bytes);
            object.content_type = content_type;

            Ok(Some(object))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            Err(StorageError::Backend(format!(
                "Failed to fetch object: {status}"
            )))
        }
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, Self::Error> {
        let url = self.url(key)?;
        let response = Head { url }.perform(self).await?;
        let status = response.status();

        if status.is_success() {
            Ok(Some(ObjectMeta {
                content_length: response.content_length().unwrap_or_default(),
                content_type: content_type_of(&response),
            }))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            Err(StorageError::Backend(format!(
                "Failed to probe object: {status}"
            )))
        }
    }
}

/// The `Content-Type` of a response, when present and readable.
fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}
