//! Content serving integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_index_document_at_root() {
        let client = client();

        let resp = client.get(url("/")).send().await.expect("get /");

        assert_eq!(resp.status(), 200);
        let content_type = resp
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(
            content_type.starts_with("text/html"),
            "root should serve html, got {content_type}"
        );

        let body = resp.text().await.expect("body");
        assert!(body.contains("StaticFront demo"), "unexpected body: {body}");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_directory_index_without_trailing_slash() {
        let client = client();

        let resp = client.get(url("/docs")).send().await.expect("get /docs");

        assert_eq!(resp.status(), 200);
        let body = resp.text().await.expect("body");
        assert!(body.contains("Documentation"), "unexpected body: {body}");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_directory_index_with_trailing_slash() {
        let client = client();

        let resp = client.get(url("/docs/")).send().await.expect("get /docs/");

        assert_eq!(resp.status(), 200);
        let body = resp.text().await.expect("body");
        assert!(body.contains("Documentation"), "unexpected body: {body}");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_stylesheet_with_css_content_type() {
        let client = client();

        let resp = client
            .get(url("/assets/style.css"))
            .send()
            .await
            .expect("get stylesheet");

        assert_eq!(resp.status(), 200);
        let content_type = resp
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(
            content_type.starts_with("text/css"),
            "stylesheet should serve css, got {content_type}"
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_head_with_headers_only() {
        let client = client();

        let resp = client.head(url("/")).send().await.expect("head /");

        assert_eq!(resp.status(), 200);
        let content_length: usize = resp
            .headers()
            .get("Content-Length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("HEAD should carry Content-Length");
        assert!(content_length > 0, "Content-Length should match the page");

        let body = resp.bytes().await.expect("body");
        assert!(body.is_empty(), "HEAD response must carry no payload");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stamp_request_id_and_server_headers() {
        let client = client();

        let resp = client.get(url("/")).send().await.expect("get /");

        assert!(
            resp.headers().contains_key("x-edge-request-id"),
            "every response should carry a request id"
        );
        assert_eq!(
            resp.headers()
                .get("Server")
                .and_then(|v| v.to_str().ok()),
            Some("StaticFront")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_expose_health_endpoint() {
        let client = client();

        let resp = client
            .get(url("/_staticfront/health"))
            .send()
            .await
            .expect("get health");

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.expect("health body should be json");
        assert_eq!(body["status"], "running");
    }
}
