//! The per-request decision pipeline.
//!
//! [`EdgePipeline`] ties the allowed-method gate, the response cache, the
//! path rewriter, and the fallback mapper into the single entry point the
//! HTTP layer calls. Each request flows through the stages in a fixed
//! order:
//!
//! 1. Gate the method; nothing below runs for write verbs.
//! 2. Probe the cache under the original `(method, path)` key.
//! 3. On a miss, rewrite the path to its origin object key.
//! 4. Fetch from the origin.
//! 5. Map the result through the fallback policy.
//! 6. Store the response under the original key, per the TTL policy.
//!
//! The pipeline holds no per-request state. One instance is shared across
//! all connections; the only interior mutability is the response cache.

use std::time::Duration;

use tracing::debug;

use crate::cache::{parse_max_age, CacheEntry, CacheKey, ResponseCache, TtlPolicy};
use crate::config::{AllowedMethods, EdgeConfig};
use crate::error::EdgeResult;
use crate::fallback::FallbackPolicy;
use crate::origin::OriginFetch;
use crate::request::{EdgeRequest, EdgeResponse};
use crate::rewrite::rewrite_path;

/// How a served response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Reused a stored response without touching the origin.
    Hit,
    /// Fetched from the origin during this request.
    Miss,
}

impl CacheStatus {
    /// Header-friendly rendering.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "Hit",
            Self::Miss => "Miss",
        }
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response plus how the cache produced it.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    /// The response to serialize to the client.
    pub response: EdgeResponse,
    /// Whether the cache or the origin produced it.
    pub cache: CacheStatus,
}

/// The edge request pipeline.
#[derive(Debug)]
pub struct EdgePipeline {
    cache: ResponseCache,
    ttl: TtlPolicy,
    allowed_methods: AllowedMethods,
    fallback: FallbackPolicy,
}

impl EdgePipeline {
    /// Build a pipeline from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::Config`](crate::error::EdgeError::Config) when
    /// the method list or fallback trigger status cannot be parsed.
    pub fn new(config: &EdgeConfig) -> EdgeResult<Self> {
        Ok(Self {
            cache: ResponseCache::new(),
            ttl: config.ttl_policy(),
            allowed_methods: config.methods()?,
            fallback: config.fallback_policy()?,
        })
    }

    /// The methods this pipeline serves.
    #[must_use]
    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.allowed_methods
    }

    /// Number of responses currently cached. Exposed for observability;
    /// stale entries count until a lookup evicts them.
    #[must_use]
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    /// Serve one request through the full pipeline.
    ///
    /// # Errors
    ///
    /// [`EdgeError::MethodNotAllowed`](crate::error::EdgeError::MethodNotAllowed)
    /// for write verbs,
    /// [`EdgeError::OriginUnavailable`](crate::error::EdgeError::OriginUnavailable)
    /// when the store cannot answer, and
    /// [`EdgeError::FallbackDocumentMissing`](crate::error::EdgeError::FallbackDocumentMissing)
    /// when a missing object cannot be mapped to the fallback document.
    pub async fn serve<O: OriginFetch + ?Sized>(
        &self,
        request: &EdgeRequest,
        origin: &O,
    ) -> EdgeResult<ServedResponse> {
        self.allowed_methods.check(request.method())?;

        // The key carries the path as the client sent it; the rewrite below
        // never feeds back into it.
        let key = CacheKey::of(request);
        if let Some(response) = self.cache.get_fresh(&key) {
            debug!(%key, "serving cached response");
            return Ok(ServedResponse {
                response,
                cache: CacheStatus::Hit,
            });
        }

        let object_key = rewrite_path(request.path());
        debug!(%key, %object_key, "cache miss, consulting origin");

        let fetched = origin.fetch_object(&object_key).await;
        let response = self.fallback.map(fetched, origin).await?;

        let ttl = self.ttl.effective(freshness_hint(&response));
        if !ttl.is_zero() {
            self.cache
                .insert(key, CacheEntry::new(response.clone(), ttl));
        }
        Ok(ServedResponse {
            response,
            cache: CacheStatus::Miss,
        })
    }
}

/// Freshness hint carried on the response's Cache-Control, if any.
fn freshness_hint(response: &EdgeResponse) -> Option<Duration> {
    response.cache_control.as_deref().and_then(parse_max_age)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
