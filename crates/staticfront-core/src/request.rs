//! Request and response values shared across the edge pipeline.
//!
//! [`EdgeRequest`] is what the HTTP layer hands to the pipeline: the method,
//! the percent-decoded path, and the host. The query string and any cookies
//! are dropped before this value is built, so nothing downstream can vary on
//! them. [`EdgeResponse`] is what the pipeline hands back, and what the
//! cache stores.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{Method, StatusCode};

use crate::error::EdgeError;

/// An inbound request as seen by the edge decision core.
///
/// The path invariant (non-empty, leading `/`) is enforced at construction;
/// every stage after that may rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRequest {
    method: Method,
    path: String,
    host: String,
}

impl EdgeRequest {
    /// Build a request for the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidPath`] when `path` is empty or does not
    /// begin with `/`.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        host: impl Into<String>,
    ) -> Result<Self, EdgeError> {
        let path = path.into();
        if path.is_empty() || !path.starts_with('/') {
            return Err(EdgeError::InvalidPath { path });
        }
        Ok(Self {
            method,
            path,
            host: host.into(),
        })
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, percent-decoded, without query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The host the client addressed, without port.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// A response the edge serves and may cache.
///
/// Bodies are [`Bytes`], so cloning a cached response shares the underlying
/// buffer instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeResponse {
    /// HTTP status to serve.
    pub status: StatusCode,
    /// Content type of the body, when known.
    pub content_type: Option<String>,
    /// Cache-Control value supplied by the origin, passed through verbatim.
    pub cache_control: Option<String>,
    /// Last modification time of the underlying object.
    pub last_modified: Option<DateTime<Utc>>,
    /// Response body.
    pub body: Bytes,
}

impl EdgeResponse {
    /// A bare response with the given status and body and no object
    /// metadata. Used for synthesized responses in tests and tooling.
    #[must_use]
    pub fn with_status(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            cache_control: None,
            last_modified: None,
            body: body.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
