//! In-memory origin object store for StaticFront.
//!
//! The origin holds the published site: immutable objects under path-like
//! keys (`/docs/index.html`), seeded once at startup from a content
//! directory. Reads are gated at the store boundary by a single-reader
//! policy naming the edge identity; there is no upload, listing, or
//! invalidation surface.
//!
//! The edge consumes the store through
//! [`OriginFetch`](staticfront_core::origin::OriginFetch), implemented
//! here by [`EdgeOriginClient`]: a capability handle carrying both the
//! bucket and the identity the policy admits.

pub mod access;
pub mod bucket;
pub mod client;
pub mod loader;

pub use access::{ObjectAcl, Principal, ReadPolicy};
pub use bucket::{ObjectBucket, StoredObject};
pub use client::EdgeOriginClient;
pub use loader::load_directory;
