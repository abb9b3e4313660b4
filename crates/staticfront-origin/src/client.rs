//! The edge layer's capability handle onto a bucket.

use std::sync::Arc;

use async_trait::async_trait;

use staticfront_core::origin::{OriginError, OriginFetch, OriginObject};

use crate::access::Principal;
use crate::bucket::ObjectBucket;

/// Read capability binding a bucket to the edge identity.
///
/// The identity travels with the handle, never with individual requests:
/// holding a client for a bucket is what authorizes the edge to read it.
/// Clones share the bucket and are handed to request tasks freely.
#[derive(Debug, Clone)]
pub struct EdgeOriginClient {
    bucket: Arc<ObjectBucket>,
    identity: Principal,
}

impl EdgeOriginClient {
    /// Client reading `bucket` as `identity`.
    #[must_use]
    pub fn new(bucket: Arc<ObjectBucket>, identity: Principal) -> Self {
        Self { bucket, identity }
    }

    /// The identity this client presents to the bucket.
    #[must_use]
    pub fn identity(&self) -> &Principal {
        &self.identity
    }
}

#[async_trait]
impl OriginFetch for EdgeOriginClient {
    async fn fetch_object(&self, key: &str) -> Result<OriginObject, OriginError> {
        self.bucket.get(&self.identity, key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
