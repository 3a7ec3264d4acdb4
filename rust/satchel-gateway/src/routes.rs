use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Request, Response, header};
use satchel_auth::{AuthError, Credentials, Identity, SecretPolicy, verify};
use satchel_manifest::Manifest;
use satchel_storage::{CredentialStore, ObjectStore, TagStore};

use crate::policy::{Access, authorize};
use crate::response;
use crate::{GatewayError, GatewaySettings};

/// The gateway itself: authentication, access policy and manifest filtering
/// in front of a single object store.
///
/// One instance serves every request. It is cheap to clone; clones share the
/// underlying store.
#[derive(Debug, Clone)]
pub struct Gateway<S> {
    store: S,
    credentials: CredentialStore<S>,
    tags: TagStore<S>,
    settings: GatewaySettings,
}

impl<S> Gateway<S>
where
    S: ObjectStore + Clone,
{
    /// Put a gateway in front of a store.
    pub fn new(store: S, settings: GatewaySettings) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone()),
            tags: TagStore::new(store.clone()),
            store,
            settings,
        }
    }

    /// Read credential records under a different key prefix.
    pub fn with_credential_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_prefix(prefix);
        self
    }

    /// Handle one request.
    ///
    /// Never fails: every error maps to its response shape here, so the
    /// connection layer only ever sees complete responses.
    pub async fn handle<B>(&self, request: Request<B>) -> Response<Full<Bytes>> {
        match self.route(&request).await {
            Ok(response) => response,
            Err(GatewayError::Auth(error)) => {
                tracing::debug!(%error, "authentication failed");
                match error {
                    AuthError::MalformedHeader => response::malformed_header(),
                    AuthError::MissingCredentials | AuthError::InvalidCredentials => {
                        response::challenge()
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%error, "request failed");
                response::upstream_failure()
            }
        }
    }

    async fn route<B>(&self, request: &Request<B>) -> Result<Response<Full<Bytes>>, GatewayError> {
        let method = request.method();
        if method != Method::GET && method != Method::HEAD {
            return Ok(response::unsupported_method());
        }

        let path = request.uri().path();

        // Every guard below matches the literal path. A spelling a URL
        // parser would rewrite (`.`, `..` or empty segments) is refused
        // before any of them run.
        if !canonical_path(path) {
            return Ok(response::forbidden());
        }

        // Routed ahead of authentication: must stay reachable with stale or
        // revoked credentials.
        if path == "/logout" {
            return Ok(response::logged_out());
        }

        let identity = self.authenticate(request, self.is_exempt(path)).await?;

        if self.settings.identity_endpoint && path == "/user.json" {
            let body = serde_json::to_vec_pretty(&identity)
                .map_err(|error| GatewayError::Upstream(format!("serializing identity: {error}")))?;
            return Ok(response::json(body));
        }

        // The dot-namespaces hold credential and tag records. Nothing under
        // them is ever served, no matter who asks.
        if path.starts_with("/.") {
            return Ok(response::forbidden());
        }

        if self.settings.enforce_path_restrictions && path.starts_with("/dist/") {
            match authorize(&self.tags, path, identity.as_ref()).await? {
                Access::Granted => {}
                Access::Denied(denial) => {
                    tracing::debug!(path, reason = ?denial, "access denied");
                    return Ok(response::forbidden());
                }
            }
        }

        let key = object_key(path);

        if self.settings.filter_manifests && path.starts_with("/p2/") && path.ends_with(".json") {
            return self.filtered_manifest(key, identity.as_ref()).await;
        }

        self.serve(method, key).await
    }

    /// Resolve the request's identity.
    ///
    /// Presented credentials are always verified, even on exempt paths; only
    /// absent credentials are excused, and only on exempt paths.
    async fn authenticate<B>(
        &self,
        request: &Request<B>,
        exempt: bool,
    ) -> Result<Option<Identity>, GatewayError> {
        let Some(value) = request.headers().get(header::AUTHORIZATION) else {
            if exempt {
                return Ok(None);
            }
            return Err(AuthError::MissingCredentials.into());
        };

        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let credentials = Credentials::from_basic(value)?;
        let record = self.credentials.record(&credentials.name).await?;
        let policy = if self.settings.hashed_secrets {
            SecretPolicy::Hashed
        } else {
            SecretPolicy::Plaintext
        };

        Ok(Some(verify(&credentials, record.as_ref(), policy)?))
    }

    fn is_exempt(&self, path: &str) -> bool {
        if self.settings.public_index && (path == "/" || path == "/index.html") {
            return true;
        }

        self.settings.public_manifests
            && (path == "/packages.json"
                || path.starts_with("/p2/")
                || path.starts_with("/include/"))
    }

    /// Fetch, filter and re-serialize a package manifest.
    async fn filtered_manifest(
        &self,
        key: &str,
        identity: Option<&Identity>,
    ) -> Result<Response<Full<Bytes>>, GatewayError> {
        let object = self
            .store
            .get(key)
            .await
            .map_err(|error| GatewayError::Upstream(error.to_string()))?;

        let Some(object) = object else {
            return Ok(response::not_found(key));
        };

        let manifest = Manifest::from_slice(&object.bytes)?;
        let visible = manifest.filtered(identity);

        Ok(response::json(visible.to_vec_pretty()?))
    }

    /// Plain object proxy for everything without special handling.
    async fn serve(
        &self,
        method: &Method,
        key: &str,
    ) -> Result<Response<Full<Bytes>>, GatewayError> {
        tracing::debug!(%method, key, "serving object");

        if method == Method::HEAD {
            let meta = self
                .store
                .head(key)
                .await
                .map_err(|error| GatewayError::Upstream(error.to_string()))?;

            return Ok(match meta {
                Some(meta) => response::metadata(meta),
                None => response::not_found(key),
            });
        }

        let object = self
            .store
            .get(key)
            .await
            .map_err(|error| GatewayError::Upstream(error.to_string()))?;

        Ok(match object {
            Some(object) => response::object(object),
            None => response::not_found(key),
        })
    }
}

/// The object key for a request path: the leading slash goes, and the empty
/// path names the index page.
fn object_key(path: &str) -> &str {
    let key = path.strip_prefix('/').unwrap_or(path);
    if key.is_empty() { "index.html" } else { key }
}

/// True when a path is a leading slash followed by plain segments: none
/// empty, none `.` or `..`. Dot-prefixed names like `.auth` are plain; the
/// namespace guard deals with those.
fn canonical_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };

    rest.is_empty()
        || rest
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
