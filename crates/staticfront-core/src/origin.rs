//! The origin object store contract.
//!
//! The pipeline consumes the origin through one seam: [`OriginFetch`], a
//! get-by-key operation returning either the object or a typed
//! [`OriginError`]. Bucket layout, access policy, and seeding all live
//! behind the seam in the store crate; tests substitute in-memory stubs.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::StatusCode;

/// An immutable object fetched from the origin store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginObject {
    /// Key the object was fetched under.
    pub key: String,
    /// Object content.
    pub body: Bytes,
    /// Content type recorded with the object.
    pub content_type: String,
    /// Cache-Control value recorded with the object, if any. The edge reads
    /// `max-age` out of it as a freshness hint.
    pub cache_control: Option<String>,
    /// When the object was last written.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Errors reported by the origin store.
///
/// Absence is an explicit result here, never an empty body. Private buckets
/// conventionally report absent keys as access denied rather than not
/// found, to avoid disclosing which keys exist; the status carried on
/// [`OriginError::Missing`] records how the store chose to report it, and
/// the fallback stage decides what the client sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    /// The key does not exist in the store.
    #[error("object missing from origin: {key} (reported as {status})")]
    Missing {
        /// The absent key.
        key: String,
        /// Status the store reports for absent keys (403 for private
        /// buckets, 404 otherwise).
        status: StatusCode,
    },

    /// The caller is not the permitted reader for this store.
    #[error("origin read denied for key: {key}")]
    Denied {
        /// The key the rejected caller asked for.
        key: String,
    },

    /// The store itself failed, as opposed to answering about a key.
    #[error("origin store unavailable: {reason}")]
    Unavailable {
        /// Human-readable failure description.
        reason: String,
    },
}

/// Get-by-key access to the origin object store.
///
/// This is the only suspension point in the request pipeline.
/// Implementations must be safe to call concurrently from many
/// request-handling tasks.
#[async_trait]
pub trait OriginFetch: Send + Sync {
    /// Fetch the object stored under `key`.
    ///
    /// # Errors
    ///
    /// [`OriginError::Missing`] when the key is absent, [`OriginError::Denied`]
    /// when the caller is not the permitted reader, and
    /// [`OriginError::Unavailable`] when the store cannot answer at all.
    async fn fetch_object(&self, key: &str) -> Result<OriginObject, OriginError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
