//! HTTP layer for the StaticFront edge.
//!
//! This crate puts the decision core on the wire. [`EdgeHttpService`]
//! implements hyper's `Service` trait: it decodes each inbound request into
//! an [`EdgeRequest`](staticfront_core::EdgeRequest), runs the pipeline,
//! and serializes the outcome back onto HTTP, including the `X-Cache`
//! header, HEAD body stripping, and the error status mapping.
//!
//! The service is generic over the origin seam, so tests drive it with
//! in-memory stores and the server binary plugs in the real bucket client.

pub mod body;
pub mod response;
pub mod service;

pub use body::EdgeResponseBody;
pub use service::EdgeHttpService;
