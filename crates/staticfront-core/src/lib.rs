//! Edge decision core for StaticFront.
//!
//! This crate holds the transport-free heart of the edge: given an inbound
//! request and a handle to the origin object store, decide what to serve.
//! The pieces are small and composable:
//!
//! - [`request`]: the request/response values the pipeline passes around.
//! - [`rewrite`]: directory-style paths mapped to their index documents.
//! - [`cache`]: keys, entries, TTL policy, and the shared response cache.
//! - [`origin`]: the [`OriginFetch`](origin::OriginFetch) seam the store
//!   implements.
//! - [`fallback`]: origin results mapped onto client responses, including
//!   the not-found document.
//! - [`engine`]: the [`EdgePipeline`] tying the stages together.
//! - [`binding`]: the DNS alias record validated at provisioning time.
//! - [`config`]: environment-driven configuration for all of the above.
//!
//! The flow for one request:
//!
//! ```text
//! EdgeRequest
//!     │
//!     ▼
//! method gate ──► cache lookup (original path) ──► rewrite ──► OriginFetch
//!                        │ hit                                     │
//!                        ▼                                         ▼
//!                  EdgeResponse ◄─────── fallback map ◄─── object / missing
//! ```
//!
//! Nothing in this crate speaks HTTP on the wire or touches the filesystem;
//! the HTTP layer and the origin store live in sibling crates.

pub mod binding;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod origin;
pub mod request;
pub mod rewrite;

pub use binding::AliasBinding;
pub use config::EdgeConfig;
pub use engine::{CacheStatus, EdgePipeline, ServedResponse};
pub use error::{EdgeError, EdgeResult};
pub use request::{EdgeRequest, EdgeResponse};
