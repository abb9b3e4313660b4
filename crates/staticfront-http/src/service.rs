//! The edge HTTP service implementing hyper's `Service` trait.
//!
//! [`EdgeHttpService`] ties request decoding, the decision pipeline, and
//! response serialization into a single hyper-compatible service. Each
//! request passes through:
//!
//! 1. Health check interception (`GET /_staticfront/health`)
//! 2. Request decoding: percent-decode the path, drop the query string and
//!    cookies, read the host
//! 3. The edge pipeline: method gate, cache, rewrite, origin, fallback
//! 4. Response serialization, including `X-Cache` and HEAD body stripping
//! 5. Common response headers (`x-edge-request-id`, `Server`)
//!
//! The service never reads request bodies; every method it serves is
//! bodyless, and a body sent anyway is dropped unread.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::service::Service;
use percent_encoding::percent_decode_str;
use tracing::{debug, info, warn};
use uuid::Uuid;

use staticfront_core::origin::OriginFetch;
use staticfront_core::{EdgePipeline, EdgeRequest};

use crate::body::EdgeResponseBody;
use crate::response::{error_to_response, served_to_response};

/// Path of the health probe endpoint. Namespaced so it can never shadow
/// site content.
pub const HEALTH_PATH: &str = "/_staticfront/health";

/// The edge HTTP service.
///
/// Generic over the origin seam `O`, so tests drive it with in-memory
/// stores and the server binary plugs in the bucket client. Clones share
/// the pipeline (and its cache) and the origin handle.
#[derive(Debug)]
pub struct EdgeHttpService<O: OriginFetch> {
    pipeline: Arc<EdgePipeline>,
    origin: Arc<O>,
}

impl<O: OriginFetch> EdgeHttpService<O> {
    /// Service owning its pipeline and origin handle.
    #[must_use]
    pub fn new(pipeline: EdgePipeline, origin: O) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            origin: Arc::new(origin),
        }
    }

    /// Service sharing an existing pipeline and origin handle.
    #[must_use]
    pub fn from_shared(pipeline: Arc<EdgePipeline>, origin: Arc<O>) -> Self {
        Self { pipeline, origin }
    }
}

impl<O: OriginFetch> Clone for EdgeHttpService<O> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            origin: Arc::clone(&self.origin),
        }
    }
}

impl<O: OriginFetch + 'static> Service<http::Request<Incoming>> for EdgeHttpService<O> {
    type Response = http::Response<EdgeResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let pipeline = Arc::clone(&self.pipeline);
        let origin = Arc::clone(&self.origin);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, &pipeline, origin.as_ref(), &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process one request through the edge pipeline.
///
/// Generic over the request body type: the edge never reads bodies, so
/// tests can call this directly with `http::Request<()>`.
async fn process_request<B, O: OriginFetch + ?Sized>(
    req: http::Request<B>,
    pipeline: &EdgePipeline,
    origin: &O,
    request_id: &str,
) -> http::Response<EdgeResponseBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing edge request");

    // 1. Health check interception.
    if method == http::Method::GET && uri.path() == HEALTH_PATH {
        return health_check_response();
    }

    // 2. Decode the request. `uri.path()` already excludes the query
    //    string; cookies stay behind in the dropped header map.
    let path = decode_path(uri.path());
    let host = host_of(&req);
    let allow = pipeline.allowed_methods().allow_header();
    drop(req);

    let request = match EdgeRequest::new(method.clone(), path, host) {
        Ok(request) => request,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "rejected malformed edge request");
            return error_to_response(&err, &allow);
        }
    };

    // 3-4. Run the pipeline and serialize the outcome.
    match pipeline.serve(&request, origin).await {
        Ok(served) => {
            info!(
                %method,
                path = %request.path(),
                status = %served.response.status,
                cache = %served.cache,
                request_id,
                "served edge request"
            );
            served_to_response(&method, &served)
        }
        Err(err) => {
            warn!(
                %method,
                path = %request.path(),
                error = %err,
                status = %err.status(),
                request_id,
                "edge request failed"
            );
            error_to_response(&err, &allow)
        }
    }
}

/// Percent-decode a request path, tolerating invalid UTF-8 by replacement.
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// The host the client addressed, without any port suffix. Bracketed IPv6
/// literals such as `[::1]:8480` keep their brackets.
fn host_of<B>(req: &http::Request<B>) -> String {
    let raw = req
        .headers()
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    // Only a colon after the closing bracket separates a port.
    match raw.rsplit_once(':') {
        Some((host, port)) if !port.contains(']') => host.to_owned(),
        _ => raw.to_owned(),
    }
}

/// Produce the health probe response.
fn health_check_response() -> http::Response<EdgeResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(EdgeResponseBody::from_string(
            r#"{"status":"running","service":"edge"}"#,
        ))
        .expect("static health response should be valid")
}

/// Add common response headers to every edge response.
fn add_common_headers(
    mut response: http::Response<EdgeResponseBody>,
    request_id: &str,
) -> http::Response<EdgeResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-edge-request-id", hv);
    }
    headers.insert(
        "Server",
        http::header::HeaderValue::from_static("StaticFront"),
    );

    response
}
