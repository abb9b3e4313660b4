//! Response caching: keys, entries, TTL policy, and the shared store.
//!
//! The cache key is the method plus the *original* request path, exactly as
//! the client sent it. The lookup runs before the rewrite stage, so `/docs`
//! and `/docs/` occupy separate slots even though both resolve to
//! `/docs/index.html` at the origin. Keying on the pre-rewrite path keeps
//! the lookup a pure map probe with no path inspection on the hit path.
//!
//! Freshness is wall-clock TTL only. There is no revalidation protocol and
//! no explicit invalidation surface; entries age out and are evicted lazily
//! by the lookup that finds them stale. Running every TTL bound at zero
//! turns the cache off in effect: entries are never fresh, and the pipeline
//! consults the origin on every request.

use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use http::Method;
use tokio::time::Instant;

use crate::request::{EdgeRequest, EdgeResponse};

// ---------------------------------------------------------------------------
// Keys and entries
// ---------------------------------------------------------------------------

/// Key identifying a cached response: method plus original request path.
///
/// The query string and cookies are excluded on purpose. Stored content
/// does not vary with them, and keying on them would let a client mint
/// unbounded distinct slots for the same object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    path: String,
}

impl CacheKey {
    /// Key for `request`, taken from the path as the client sent it.
    #[must_use]
    pub fn of(request: &EdgeRequest) -> Self {
        Self {
            method: request.method().clone(),
            path: request.path().to_owned(),
        }
    }

    /// The method component.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A stored response with its freshness window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    response: EdgeResponse,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Entry stored now with the given freshness window.
    #[must_use]
    pub fn new(response: EdgeResponse, ttl: Duration) -> Self {
        Self {
            response,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Whether the entry is still fresh at `now`. A zero TTL is never
    /// fresh, not even in the instant it was stored.
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) < self.ttl
    }

    /// The stored response.
    #[must_use]
    pub fn response(&self) -> &EdgeResponse {
        &self.response
    }
}

// ---------------------------------------------------------------------------
// TTL policy
// ---------------------------------------------------------------------------

/// Minimum, default, and maximum bounds for response TTLs.
///
/// The default applies when the origin provides no freshness hint; a hint
/// (`max-age` from Cache-Control) is clamped into `[min, max]`. All three
/// bounds at zero is the supported always-revalidate mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    min: Duration,
    default: Duration,
    max: Duration,
}

impl TtlPolicy {
    /// Policy with the given bounds. Callers keep `min <= default <= max`;
    /// configuration validation enforces it before a policy is built.
    #[must_use]
    pub const fn new(min: Duration, default: Duration, max: Duration) -> Self {
        Self { min, default, max }
    }

    /// The all-zero policy: nothing is ever considered fresh.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Effective storage TTL for a response, given the origin's freshness
    /// hint when it sent one.
    ///
    /// Crossed bounds from direct construction do not panic: `min` wins
    /// and acts as both limits.
    #[must_use]
    pub fn effective(&self, origin_hint: Option<Duration>) -> Duration {
        let upper = self.max.max(self.min);
        origin_hint.unwrap_or(self.default).clamp(self.min, upper)
    }
}

/// Extract the `max-age` directive from a Cache-Control header value.
///
/// Directive names are matched case-insensitively; `s-maxage` and other
/// directives are ignored. Returns `None` when no parseable `max-age` is
/// present.
#[must_use]
pub fn parse_max_age(value: &str) -> Option<Duration> {
    value.split(',').find_map(|directive| {
        let (name, seconds) = directive.trim().split_once('=')?;
        if name.trim().eq_ignore_ascii_case("max-age") {
            seconds.trim().parse::<u64>().ok().map(Duration::from_secs)
        } else {
            None
        }
    })
}

// ---------------------------------------------------------------------------
// The shared store
// ---------------------------------------------------------------------------

/// Shared store of cached responses, keyed by [`CacheKey`].
///
/// Safe for concurrent reads and writes from many request tasks. Writes
/// are upserts with last-writer-wins semantics; entries are immutable once
/// written and expire by TTL. The lookup that finds a stale entry evicts
/// it.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh response stored under `key`, if any.
    ///
    /// A stale entry found here is removed before returning `None`.
    #[must_use]
    pub fn get_fresh(&self, key: &CacheKey) -> Option<EdgeResponse> {
        let now = Instant::now();
        // The map guard must drop before the remove below can run.
        let hit = self
            .entries
            .get(key)
            .map(|entry| entry.is_fresh(now).then(|| entry.response().clone()));
        match hit {
            Some(Some(response)) => Some(response),
            Some(None) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `entry` under `key`. The last writer for a key wins.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    /// Number of entries currently stored, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
