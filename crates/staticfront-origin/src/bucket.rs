//! The in-memory object bucket.
//!
//! Objects are immutable once stored and addressed by path-like keys with
//! a leading `/`. Every read passes the bucket's [`ReadPolicy`] before the
//! keyspace is consulted, so a rejected caller learns nothing about which
//! keys exist. Absent keys are reported with the bucket's missing status:
//! private buckets (the default) answer 403 rather than 404, again to
//! avoid disclosing the keyspace.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use http::StatusCode;
use tracing::{debug, trace};

use staticfront_core::origin::{OriginError, OriginObject};

use crate::access::{ObjectAcl, Principal, ReadPolicy};

/// An object at rest in the bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object content.
    pub body: Bytes,
    /// Content type recorded at write time.
    pub content_type: String,
    /// Cache-Control value to hand to the edge verbatim, if any.
    pub cache_control: Option<String>,
    /// When the object was written.
    pub last_modified: DateTime<Utc>,
    /// Per-object visibility marking. Never overrides the bucket policy.
    pub acl: ObjectAcl,
}

impl StoredObject {
    /// A private object with the given body and content type, stamped now.
    #[must_use]
    pub fn new(body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            cache_control: None,
            last_modified: Utc::now(),
            acl: ObjectAcl::default(),
        }
    }

    /// Attach a Cache-Control value for the edge to pass through.
    #[must_use]
    pub fn with_cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Set the visibility marking.
    #[must_use]
    pub fn with_acl(mut self, acl: ObjectAcl) -> Self {
        self.acl = acl;
        self
    }
}

/// In-memory bucket of site objects.
///
/// Concurrent reads are lock-free per shard; writes happen only during
/// seeding. The policy gate runs before the key lookup on every read.
#[derive(Debug)]
pub struct ObjectBucket {
    name: String,
    objects: DashMap<String, StoredObject>,
    policy: ReadPolicy,
    missing_status: StatusCode,
}

impl ObjectBucket {
    /// New private bucket readable only per `policy`. Absent keys report
    /// 403.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: ReadPolicy) -> Self {
        Self {
            name: name.into(),
            objects: DashMap::new(),
            policy,
            missing_status: StatusCode::FORBIDDEN,
        }
    }

    /// Change how absent keys are reported (a non-private store would use
    /// a plain 404).
    #[must_use]
    pub fn with_missing_status(mut self, status: StatusCode) -> Self {
        self.missing_status = status;
        self
    }

    /// The bucket name, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `object` under `key`. Seeding interface; the last write for a
    /// key wins.
    pub fn put(&self, key: impl Into<String>, object: StoredObject) {
        let key = key.into();
        trace!(bucket = %self.name, %key, size = object.body.len(), "storing object");
        self.objects.insert(key, object);
    }

    /// Fetch `key` on behalf of `caller`.
    ///
    /// The policy gate runs first: a caller the policy rejects is denied
    /// even for `PublicRead` objects and even for keys that do not exist.
    ///
    /// # Errors
    ///
    /// [`OriginError::Denied`] for callers outside the policy,
    /// [`OriginError::Missing`] (with the bucket's missing status) for
    /// absent keys.
    pub fn get(&self, caller: &Principal, key: &str) -> Result<OriginObject, OriginError> {
        if !self.policy.permits(caller) {
            debug!(bucket = %self.name, %caller, %key, "read denied by bucket policy");
            return Err(OriginError::Denied {
                key: key.to_owned(),
            });
        }
        match self.objects.get(key) {
            Some(stored) => {
                trace!(bucket = %self.name, %key, "object served");
                Ok(OriginObject {
                    key: key.to_owned(),
                    body: stored.body.clone(),
                    content_type: stored.content_type.clone(),
                    cache_control: stored.cache_control.clone(),
                    last_modified: Some(stored.last_modified),
                })
            }
            None => {
                debug!(bucket = %self.name, %key, status = %self.missing_status, "object missing");
                Err(OriginError::Missing {
                    key: key.to_owned(),
                    status: self.missing_status,
                })
            }
        }
    }

    /// Number of objects stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the bucket holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
