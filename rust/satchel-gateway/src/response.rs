//! Canned HTTP responses.
//!
//! Every response the gateway produces is built here, so that the exact
//! bytes of each outcome live in one place. The challenge shape is the same
//! for "unknown account" and "wrong secret"; the two must stay inseparable.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode, header};
use satchel_storage::{Object, ObjectMeta};

/// Realm announced in the `WWW-Authenticate` challenge.
const REALM: &str = "Authenticate to Satchel repository";

/// 401 with the Basic challenge, inviting the client to authenticate.
pub(crate) fn challenge() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(
            header::WWW_AUTHENTICATE,
            format!(r#"Basic realm="{REALM}", charset="UTF-8""#),
        )
        .body(Full::new(Bytes::from("Unauthorized - You need to login")))
        .expect("static response parts are valid")
}

/// 400 for an `Authorization` header that could not be parsed.
pub(crate) fn malformed_header() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .body(Full::new(Bytes::from("Malformed authorization header.")))
        .expect("static response parts are valid")
}

/// 403 used uniformly for every policy denial.
pub(crate) fn forbidden() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .body(Full::new(Bytes::from("Forbidden")))
        .expect("static response parts are valid")
}

/// 401 without a `WWW-Authenticate` header.
///
/// Returning 401 makes clients discard their cached Basic credentials;
/// omitting the challenge keeps browsers from immediately prompting for
/// credentials again.
pub(crate) fn logged_out() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .body(Full::new(Bytes::from("Logged out.")))
        .expect("static response parts are valid")
}

/// 400 for anything other than GET or HEAD.
pub(crate) fn unsupported_method() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .body(Full::new(Bytes::from("Unsupported method")))
        .expect("static response parts are valid")
}

/// 502 for a backing store that failed or returned corrupt data.
pub(crate) fn upstream_failure() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::BAD_GATEWAY)
        .body(Full::new(Bytes::from("Upstream failure")))
        .expect("static response parts are valid")
}

/// 404 naming the missing object, HTML-escaped.
pub(crate) fn not_found(name: &str) -> Response<Full<Bytes>> {
    let body = format!(
        r#"<html><body>Object "<b>{}</b>" not found</body></html>"#,
        escape_html(name)
    );

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/html; charset=UTF-8")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts are valid")
}

/// 200 with a JSON document.
pub(crate) fn json(body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(body.into()))
        .expect("static response parts are valid")
}

/// 200 with an object's bytes and stored content type.
pub(crate) fn object(object: Object) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(StatusCode::OK);

    if let Some(value) = content_type_header(object.content_type.as_deref()) {
        builder = builder.header(header::CONTENT_TYPE, value);
    }

    builder
        .body(Full::new(object.bytes))
        .expect("static response parts are valid")
}

/// 200 with an object's metadata only, for HEAD requests.
pub(crate) fn metadata(meta: ObjectMeta) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_LENGTH, meta.content_length);

    if let Some(value) = content_type_header(meta.content_type.as_deref()) {
        builder = builder.header(header::CONTENT_TYPE, value);
    }

    builder
        .body(Full::new(Bytes::new()))
        .expect("static response parts are valid")
}

/// A stored content type may hold bytes a header value cannot; such an
/// object is served without one.
fn content_type_header(content_type: Option<&str>) -> Option<HeaderValue> {
    content_type.and_then(|value| HeaderValue::from_str(value).ok())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}
