//! StaticFront edge server.
//!
//! This binary serves a published static site from an in-memory origin
//! bucket through the edge delivery pipeline: directory-path rewriting,
//! response caching, and the not-found fallback. The site content is
//! seeded once at startup from a local directory.
//!
//! # Usage
//!
//! ```text
//! ORIGIN_DIR=./site EDGE_LISTEN=0.0.0.0:8480 staticfront-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EDGE_LISTEN` | `0.0.0.0:8480` | Bind address |
//! | `EDGE_DOMAIN` | `localhost` | Public domain for the alias binding |
//! | `EDGE_DNS_ZONE_REF` | *(empty)* | DNS zone for the alias binding (empty = skip) |
//! | `EDGE_CERTIFICATE_REF` | *(empty)* | TLS certificate reference |
//! | `EDGE_TTL_MIN_SECS` | `0` | Minimum response TTL |
//! | `EDGE_TTL_DEFAULT_SECS` | `3600` | TTL when the origin sends no hint |
//! | `EDGE_TTL_MAX_SECS` | `86400` | Maximum response TTL |
//! | `EDGE_ALLOWED_METHODS` | `GET,HEAD,OPTIONS` | Served methods |
//! | `EDGE_FALLBACK_DOCUMENT` | `/404.html` | Origin key served for missing objects |
//! | `EDGE_FALLBACK_TRIGGER_STATUS` | `403` | Origin status treated as "missing" besides 404 |
//! | `ORIGIN_DIR` | *(unset)* | Directory to seed the origin bucket from |
//! | `ORIGIN_BUCKET` | `site` | Origin bucket name |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use staticfront_core::{EdgeConfig, EdgePipeline};
use staticfront_http::service::HEALTH_PATH;
use staticfront_http::EdgeHttpService;
use staticfront_origin::{load_directory, EdgeOriginClient, ObjectBucket, Principal, ReadPolicy};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The principal the origin bucket admits. Nothing else ever reads it.
const EDGE_IDENTITY: &str = "staticfront-edge";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Validate the alias binding that attaches the public domain to this
/// endpoint, when a DNS zone is configured.
fn provision_alias_binding(config: &EdgeConfig) -> Result<()> {
    if config.dns_zone_ref.is_empty() {
        debug!(domain = %config.domain, "no DNS zone configured, skipping alias binding");
        return Ok(());
    }
    let binding = config.alias_binding(config.listen.clone());
    binding
        .validate()
        .with_context(|| format!("invalid alias binding for {}", binding.domain))?;
    info!(
        domain = %binding.domain,
        zone = %binding.zone_ref,
        target = %binding.target,
        "validated alias binding"
    );
    Ok(())
}

/// Build the origin bucket and the edge's read capability onto it.
///
/// The bucket admits exactly one reader, the edge identity minted here;
/// the returned client is the only handle that identity lives in.
fn build_origin(bucket_name: &str, content_dir: Option<&Path>) -> Result<EdgeOriginClient> {
    let identity = Principal::new(EDGE_IDENTITY);
    let bucket = ObjectBucket::new(bucket_name, ReadPolicy::single_reader(identity.clone()));

    match content_dir {
        Some(dir) => {
            let count = load_directory(&bucket, dir)
                .with_context(|| format!("seeding origin from {}", dir.display()))?;
            if count == 0 {
                warn!(root = %dir.display(), "content directory is empty");
            }
        }
        None => {
            warn!("ORIGIN_DIR not set; origin bucket starts empty and every request will take the fallback path");
        }
    }

    Ok(EdgeOriginClient::new(Arc::new(bucket), identity))
}

/// Run the accept loop, serving connections until a shutdown signal is
/// received.
async fn serve(listener: TcpListener, service: EdgeHttpService<EdgeOriginClient>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the edge and requesting the
/// health endpoint.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request =
        format!("GET {HEALTH_PATH} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Read the origin bucket name from the environment.
fn origin_bucket_name() -> String {
    bucket_name_value(std::env::var("ORIGIN_BUCKET").ok().as_deref())
}

/// Resolve a raw `ORIGIN_BUCKET` value to a bucket name, defaulting to
/// `site`.
fn bucket_name_value(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => "site".to_owned(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = EdgeConfig::from_env();

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    config.validate().context("invalid edge configuration")?;
    provision_alias_binding(&config)?;

    let pipeline = EdgePipeline::new(&config).context("building edge pipeline")?;

    let content_dir = std::env::var("ORIGIN_DIR").ok();
    let origin = build_origin(
        &origin_bucket_name(),
        content_dir.as_deref().map(Path::new),
    )?;

    let service = EdgeHttpService::new(pipeline, origin);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        domain = %config.domain,
        ttl_default_secs = config.ttl_default_secs,
        fallback_document = %config.fallback_document,
        version = VERSION,
        "starting StaticFront edge",
    );

    serve(listener, service).await
}
