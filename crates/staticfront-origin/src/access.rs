//! Read access control at the store boundary.
//!
//! A bucket is constructed with a [`ReadPolicy`] naming the single
//! principal allowed to fetch from it. The check is static: nothing can
//! widen the policy after construction, and per-object visibility markings
//! never override it. A caller the policy rejects is denied before the
//! keyspace is even consulted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identity that may attempt reads against a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Principal with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The principal name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-object visibility marking.
///
/// A `PublicRead` marking does not bypass the bucket's [`ReadPolicy`]; the
/// policy is checked first for every caller, so on a single-reader bucket
/// the marking is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    /// Readable only through the bucket policy.
    #[default]
    Private,
    /// Marked world-readable by the uploader.
    PublicRead,
}

impl ObjectAcl {
    /// Canonical string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
        }
    }
}

impl fmt::Display for ObjectAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single-reader policy enforced at the bucket boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPolicy {
    reader: Principal,
}

impl ReadPolicy {
    /// Policy permitting exactly `reader` and nobody else.
    #[must_use]
    pub fn single_reader(reader: Principal) -> Self {
        Self { reader }
    }

    /// Whether `caller` may read from the bucket.
    #[must_use]
    pub fn permits(&self, caller: &Principal) -> bool {
        *caller == self.reader
    }

    /// The one permitted reader.
    #[must_use]
    pub fn reader(&self) -> &Principal {
        &self.reader
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
