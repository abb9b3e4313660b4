//! Serializing pipeline output onto HTTP responses.
//!
//! Two entry points: [`served_to_response`] for responses the pipeline
//! produced (object bodies and fallback 404s alike), and
//! [`error_to_response`] for the pipeline's refusals. Both return complete
//! responses; the service layer only stamps common headers on top.
//!
//! HEAD is handled here: the response keeps every header, including
//! `Content-Length`, and drops only the payload.

use http::header::HeaderValue;
use http::{Method, Response, StatusCode};

use staticfront_core::error::EdgeError;
use staticfront_core::ServedResponse;

use crate::body::EdgeResponseBody;

/// `X-Cache` value for responses that never reached the pipeline's cache
/// bookkeeping, i.e. errors.
const X_CACHE_ERROR: &str = "Error";

/// Build the HTTP response for a served pipeline result.
///
/// Object metadata maps onto `Content-Type`, `Cache-Control`, and
/// `Last-Modified`; `X-Cache` reports whether the cache or the origin
/// produced the response.
#[must_use]
pub fn served_to_response(method: &Method, served: &ServedResponse) -> Response<EdgeResponseBody> {
    let response = &served.response;
    let mut builder = Response::builder().status(response.status);
    builder = set_optional_header(builder, "Content-Type", response.content_type.as_deref());
    builder = set_optional_header(builder, "Cache-Control", response.cache_control.as_deref());
    builder = set_optional_timestamp_header(builder, "Last-Modified", response.last_modified.as_ref());
    builder = builder
        .header("Content-Length", response.body.len())
        .header("X-Cache", served.cache.as_str());

    let body = if *method == Method::HEAD {
        EdgeResponseBody::empty()
    } else {
        EdgeResponseBody::from_bytes(response.body.clone())
    };
    build_response(builder, body)
}

/// Build the HTTP response for a pipeline error.
///
/// The status comes from [`EdgeError::status`]; 405 responses additionally
/// carry an `Allow` header listing `allow`.
#[must_use]
pub fn error_to_response(err: &EdgeError, allow: &str) -> Response<EdgeResponseBody> {
    let status = err.status();
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Cache", X_CACHE_ERROR);
    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder = set_optional_header(builder, "Allow", Some(allow));
    }
    build_response(builder, EdgeResponseBody::from_string(format!("{err}\n")))
}

// ---------------------------------------------------------------------------
// Helper functions for building responses
// ---------------------------------------------------------------------------

/// Set an optional header on a response builder if the value is `Some`.
fn set_optional_header(
    builder: http::response::Builder,
    name: &str,
    value: Option<&str>,
) -> http::response::Builder {
    if let Some(v) = value {
        if let Ok(hv) = HeaderValue::from_str(v) {
            return builder.header(name, hv);
        }
    }
    builder
}

/// Set an optional HTTP date header from a `DateTime<Utc>`.
fn set_optional_timestamp_header(
    builder: http::response::Builder,
    name: &str,
    value: Option<&chrono::DateTime<chrono::Utc>>,
) -> http::response::Builder {
    if let Some(v) = value {
        let formatted = v.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(hv) = HeaderValue::from_str(&formatted) {
            return builder.header(name, hv);
        }
    }
    builder
}

/// Build a response from a builder. Header values are validated before
/// they reach the builder, so failure only happens for a malformed status;
/// that degrades to a bare 500.
fn build_response(
    builder: http::response::Builder,
    body: EdgeResponseBody,
) -> Response<EdgeResponseBody> {
    builder.body(body).unwrap_or_else(|_| {
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(EdgeResponseBody::empty())
            .expect("static response should be valid")
    })
}
