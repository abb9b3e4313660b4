//! Mapping origin results onto client responses.
//!
//! A found object becomes a plain 200. An absent object becomes the
//! configured fallback document served with status 404, and that includes
//! absence reported as 403: private buckets answer "forbidden" for keys
//! that do not exist rather than disclosing which keys do. Clients see a
//! branded not-found page either way, never the bucket's raw refusal.
//!
//! Two failure modes deliberately escape the mapping. A store outage is a
//! 502, because serving the not-found page for an outage would mislabel
//! every page on the site as missing. And the fallback document itself
//! going missing is a 500 configuration error; re-entering the fallback for
//! it would recurse.

use http::StatusCode;
use tracing::{debug, warn};

use crate::error::EdgeError;
use crate::origin::{OriginError, OriginFetch, OriginObject};
use crate::request::EdgeResponse;

/// Default origin key of the fallback document.
pub const DEFAULT_FALLBACK_DOCUMENT: &str = "/404.html";

/// Policy mapping origin "object missing" signals to the fallback document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    document_path: String,
    trigger_status: StatusCode,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_DOCUMENT, StatusCode::FORBIDDEN)
    }
}

impl FallbackPolicy {
    /// Policy serving `document_path` for missing objects, treating
    /// `trigger_status` as a missing-object report in addition to 404.
    #[must_use]
    pub fn new(document_path: impl Into<String>, trigger_status: StatusCode) -> Self {
        Self {
            document_path: document_path.into(),
            trigger_status,
        }
    }

    /// Origin key of the fallback document.
    #[must_use]
    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    /// Whether an origin-reported status falls in the missing-object class.
    /// 404 always does; the configured trigger status does too.
    #[must_use]
    pub fn is_missing_status(&self, status: StatusCode) -> bool {
        status == StatusCode::NOT_FOUND || status == self.trigger_status
    }

    /// Map an origin fetch result onto the response the client receives.
    ///
    /// # Errors
    ///
    /// [`EdgeError::OriginUnavailable`] when the store failed or denied the
    /// edge identity, and [`EdgeError::FallbackDocumentMissing`] when the
    /// fallback document itself cannot be fetched.
    pub async fn map<O: OriginFetch + ?Sized>(
        &self,
        result: Result<OriginObject, OriginError>,
        origin: &O,
    ) -> Result<EdgeResponse, EdgeError> {
        match result {
            Ok(object) => Ok(object_response(object, StatusCode::OK)),
            Err(OriginError::Missing { key, status }) if self.is_missing_status(status) => {
                debug!(%key, %status, document = %self.document_path, "origin object missing, serving fallback document");
                self.fallback_response(origin).await
            }
            Err(OriginError::Missing { key, status }) => {
                warn!(%key, %status, "origin reported absence with a status outside the missing class");
                Err(EdgeError::OriginUnavailable {
                    reason: format!("unexpected origin status {status} for key {key}"),
                })
            }
            Err(OriginError::Denied { key }) => {
                // The edge identity is the permitted reader; a denial means
                // the deployment wiring is broken, not that a page is gone.
                warn!(%key, "origin denied the edge identity");
                Err(EdgeError::OriginUnavailable {
                    reason: format!("origin denied edge access for key {key}"),
                })
            }
            Err(OriginError::Unavailable { reason }) => {
                Err(EdgeError::OriginUnavailable { reason })
            }
        }
    }

    /// Fetch and serve the fallback document with status 404.
    ///
    /// Its own absence is reported as configuration breakage; there is no
    /// second level of fallback.
    async fn fallback_response<O: OriginFetch + ?Sized>(
        &self,
        origin: &O,
    ) -> Result<EdgeResponse, EdgeError> {
        match origin.fetch_object(&self.document_path).await {
            Ok(object) => Ok(object_response(object, StatusCode::NOT_FOUND)),
            Err(OriginError::Unavailable { reason }) => {
                Err(EdgeError::OriginUnavailable { reason })
            }
            Err(OriginError::Missing { .. } | OriginError::Denied { .. }) => {
                Err(EdgeError::FallbackDocumentMissing {
                    path: self.document_path.clone(),
                })
            }
        }
    }
}

/// Response carrying an origin object's content and metadata under the
/// given status.
fn object_response(object: OriginObject, status: StatusCode) -> EdgeResponse {
    EdgeResponse {
        status,
        content_type: Some(object.content_type),
        cache_control: object.cache_control,
        last_modified: object.last_modified,
        body: object.body,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;

    /// Origin stub: a fixed key-to-body map, or a hard failure.
    struct StubOrigin {
        objects: HashMap<String, &'static str>,
        missing_status: StatusCode,
        down: bool,
    }

    impl StubOrigin {
        fn with_pages(pages: &[(&str, &'static str)]) -> Self {
            Self {
                objects: pages
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), *v))
                    .collect(),
                missing_status: StatusCode::FORBIDDEN,
                down: false,
            }
        }

        fn down() -> Self {
            Self {
                objects: HashMap::new(),
                missing_status: StatusCode::FORBIDDEN,
                down: true,
            }
        }
    }

    #[async_trait]
    impl OriginFetch for StubOrigin {
        async fn fetch_object(&self, key: &str) -> Result<OriginObject, OriginError> {
            if self.down {
                return Err(OriginError::Unavailable {
                    reason: "store offline".to_owned(),
                });
            }
            match self.objects.get(key) {
                Some(body) => Ok(OriginObject {
                    key: key.to_owned(),
                    body: Bytes::from_static(body.as_bytes()),
                    content_type: "text/html; charset=utf-8".to_owned(),
                    cache_control: None,
                    last_modified: None,
                }),
                None => Err(OriginError::Missing {
                    key: key.to_owned(),
                    status: self.missing_status,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_should_pass_found_object_through_as_ok() {
        let origin = StubOrigin::with_pages(&[("/index.html", "<html>home</html>")]);
        let policy = FallbackPolicy::default();

        let result = origin.fetch_object("/index.html").await;
        let response = policy
            .map(result, &origin)
            .await
            .expect("found object should map cleanly");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Bytes::from_static(b"<html>home</html>"));
        assert_eq!(
            response.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_should_serve_fallback_with_404_for_denied_style_absence() {
        // Private buckets report missing keys as 403. The client still gets
        // the branded page with a 404, never the raw 403.
        let origin = StubOrigin::with_pages(&[("/404.html", "<html>not found</html>")]);
        let policy = FallbackPolicy::default();

        let result = origin.fetch_object("/ghost.html").await;
        let response = policy
            .map(result, &origin)
            .await
            .expect("missing object should map to the fallback document");

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, Bytes::from_static(b"<html>not found</html>"));
    }

    #[tokio::test]
    async fn test_should_serve_fallback_for_plain_not_found_reports() {
        let mut origin = StubOrigin::with_pages(&[("/404.html", "<html>not found</html>")]);
        origin.missing_status = StatusCode::NOT_FOUND;
        let policy = FallbackPolicy::default();

        let result = origin.fetch_object("/ghost.html").await;
        let response = policy.map(result, &origin).await.expect("404 is in the missing class");

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_fail_loudly_when_fallback_document_is_absent() {
        let origin = StubOrigin::with_pages(&[]);
        let policy = FallbackPolicy::default();

        let result = origin.fetch_object("/ghost.html").await;
        let err = policy.map(result, &origin).await.unwrap_err();

        assert!(
            matches!(err, EdgeError::FallbackDocumentMissing { ref path } if path == "/404.html"),
            "got {err:?}"
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_should_not_mask_store_outage_with_fallback() {
        let origin = StubOrigin::down();
        let policy = FallbackPolicy::default();

        let result = origin.fetch_object("/index.html").await;
        let err = policy.map(result, &origin).await.unwrap_err();

        assert!(matches!(err, EdgeError::OriginUnavailable { .. }), "got {err:?}");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_should_treat_identity_denial_as_unavailable() {
        let origin = StubOrigin::with_pages(&[("/404.html", "<html>not found</html>")]);
        let policy = FallbackPolicy::default();

        let denied: Result<OriginObject, OriginError> = Err(OriginError::Denied {
            key: "/index.html".to_owned(),
        });
        let err = policy.map(denied, &origin).await.unwrap_err();

        assert!(matches!(err, EdgeError::OriginUnavailable { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_should_reject_missing_status_outside_the_class() {
        let origin = StubOrigin::with_pages(&[("/404.html", "<html>not found</html>")]);
        let policy = FallbackPolicy::default();

        let odd: Result<OriginObject, OriginError> = Err(OriginError::Missing {
            key: "/index.html".to_owned(),
            status: StatusCode::IM_A_TEAPOT,
        });
        let err = policy.map(odd, &origin).await.unwrap_err();

        assert!(matches!(err, EdgeError::OriginUnavailable { .. }), "got {err:?}");
    }

    #[test]
    fn test_should_classify_missing_statuses() {
        let policy = FallbackPolicy::default();
        assert!(policy.is_missing_status(StatusCode::NOT_FOUND));
        assert!(policy.is_missing_status(StatusCode::FORBIDDEN));
        assert!(!policy.is_missing_status(StatusCode::INTERNAL_SERVER_ERROR));

        let strict = FallbackPolicy::new("/404.html", StatusCode::NOT_FOUND);
        assert!(strict.is_missing_status(StatusCode::NOT_FOUND));
        assert!(!strict.is_missing_status(StatusCode::FORBIDDEN));
    }
}
