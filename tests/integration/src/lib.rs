//! Integration tests for the StaticFront edge server.
//!
//! These tests require a running edge server at `localhost:8480`, seeded
//! with the demo site:
//!
//! ```text
//! ORIGIN_DIR=demos/site cargo run -p staticfront-server
//! ```
//!
//! They are marked `#[ignore]` so they don't run during normal
//! `cargo test`. Run them with:
//!
//! ```text
//! cargo test -p staticfront-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the edge server.
fn base_url() -> String {
    std::env::var("EDGE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8480".to_owned())
}

/// Full URL for a path on the edge server.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// Create an HTTP client pointing at the edge server.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a request path that is certain not to exist in the demo site.
#[must_use]
pub fn missing_path(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("/{prefix}-{id}")
}

mod test_caching;
mod test_errors;
mod test_serving;
