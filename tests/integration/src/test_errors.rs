//! Error handling integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, missing_path, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_fallback_document_for_missing_page() {
        let client = client();

        let resp = client
            .get(url(&missing_path("ghost")))
            .send()
            .await
            .expect("get missing page");

        assert_eq!(resp.status(), 404);
        let body = resp.text().await.expect("body");
        assert!(
            body.contains("Page not found"),
            "404s should serve the fallback document, got: {body}"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_keep_not_found_status_for_head() {
        let client = client();

        let resp = client
            .head(url(&missing_path("ghost-head")))
            .send()
            .await
            .expect("head missing page");

        assert_eq!(resp.status(), 404);
        let body = resp.bytes().await.expect("body");
        assert!(body.is_empty(), "HEAD response must carry no payload");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_post_with_allow_header() {
        let client = client();

        let resp = client.post(url("/")).send().await.expect("post");

        assert_eq!(resp.status(), 405);
        let allow = resp
            .headers()
            .get("Allow")
            .and_then(|v| v.to_str().ok())
            .expect("405 should carry Allow");
        assert!(allow.contains("GET"), "Allow should list GET: {allow}");
        assert!(allow.contains("HEAD"), "Allow should list HEAD: {allow}");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_delete() {
        let client = client();

        let resp = client
            .delete(url("/index.html"))
            .send()
            .await
            .expect("delete");

        assert_eq!(resp.status(), 405);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_put() {
        let client = client();

        let resp = client
            .put(url("/index.html"))
            .body("<html>overwrite</html>")
            .send()
            .await
            .expect("put");

        assert_eq!(resp.status(), 405);
    }
}
