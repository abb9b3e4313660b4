//! Edge configuration.
//!
//! Configuration is environment-driven, with builder and serde surfaces
//! for tests and tooling. Recognized variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `EDGE_LISTEN` | `0.0.0.0:8480` | Bind address for the edge listener |
//! | `EDGE_DOMAIN` | `localhost` | Public domain bound to the endpoint |
//! | `EDGE_CERTIFICATE_REF` | (empty) | Reference to the TLS certificate for the domain |
//! | `EDGE_DNS_ZONE_REF` | (empty) | Reference to the DNS zone for the alias binding |
//! | `EDGE_TTL_MIN_SECS` | `0` | Minimum response TTL |
//! | `EDGE_TTL_DEFAULT_SECS` | `3600` | TTL when the origin sends no hint |
//! | `EDGE_TTL_MAX_SECS` | `86400` | Maximum response TTL |
//! | `EDGE_ALLOWED_METHODS` | `GET,HEAD,OPTIONS` | Served methods, a subset of the safe set |
//! | `EDGE_FALLBACK_DOCUMENT` | `/404.html` | Origin key served for missing objects |
//! | `EDGE_FALLBACK_TRIGGER_STATUS` | `403` | Origin status treated as "missing" besides 404 |
//! | `LOG_LEVEL` | `info` | Log level filter |
//!
//! [`EdgeConfig::validate`] runs at provisioning time and rejects anything
//! the pipeline would otherwise have to guess about: inverted TTL bounds,
//! write verbs in the method list, a relative fallback document path.

use std::net::SocketAddr;
use std::time::Duration;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::binding::AliasBinding;
use crate::cache::TtlPolicy;
use crate::error::{EdgeError, EdgeResult};
use crate::fallback::FallbackPolicy;

/// Whether a method belongs to the safe set the edge may ever serve.
fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

// ---------------------------------------------------------------------------
// Allowed methods
// ---------------------------------------------------------------------------

/// The set of methods the edge serves.
///
/// Constrained at construction to the safe set: GET, HEAD, OPTIONS. Write
/// verbs cannot be configured in; they are rejected before the cache or
/// origin ever see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods(Vec<Method>);

impl Default for AllowedMethods {
    fn default() -> Self {
        Self(vec![Method::GET, Method::HEAD, Method::OPTIONS])
    }
}

impl AllowedMethods {
    /// Build from an explicit method list.
    ///
    /// # Errors
    ///
    /// [`EdgeError::Config`] when the list is empty or contains a method
    /// outside the safe set.
    pub fn new(methods: Vec<Method>) -> EdgeResult<Self> {
        if methods.is_empty() {
            return Err(EdgeError::Config("allowed methods list is empty".to_owned()));
        }
        if let Some(unsafe_method) = methods.iter().find(|m| !is_safe_method(m)) {
            return Err(EdgeError::Config(format!(
                "method {unsafe_method} is outside the safe set (GET, HEAD, OPTIONS)"
            )));
        }
        Ok(Self(methods))
    }

    /// Parse a comma-separated list such as `GET,HEAD,OPTIONS`.
    ///
    /// # Errors
    ///
    /// [`EdgeError::Config`] when a token is not a method or the parsed
    /// list fails [`AllowedMethods::new`].
    pub fn parse(raw: &str) -> EdgeResult<Self> {
        let mut methods = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let method = token
                .to_ascii_uppercase()
                .parse::<Method>()
                .map_err(|_| EdgeError::Config(format!("unparseable method token {token:?}")))?;
            methods.push(method);
        }
        Self::new(methods)
    }

    /// Whether `method` is in the set.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.0.contains(method)
    }

    /// Gate a request method.
    ///
    /// # Errors
    ///
    /// [`EdgeError::MethodNotAllowed`] when `method` is not in the set.
    pub fn check(&self, method: &Method) -> EdgeResult<()> {
        if self.contains(method) {
            Ok(())
        } else {
            Err(EdgeError::MethodNotAllowed {
                method: method.to_string(),
            })
        }
    }

    /// The set rendered for an `Allow` header: `GET, HEAD, OPTIONS`.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.0
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Edge configuration
// ---------------------------------------------------------------------------

/// Configuration for the edge delivery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeConfig {
    /// Bind address for the edge listener.
    #[builder(default = String::from("0.0.0.0:8480"))]
    pub listen: String,

    /// Public domain the alias binding attaches to the edge endpoint.
    #[builder(default = String::from("localhost"))]
    pub domain: String,

    /// Reference to the TLS certificate presented for `domain`. Opaque
    /// here; issuance and renewal belong to the provisioning layer.
    #[builder(default)]
    pub certificate_ref: String,

    /// Reference to the DNS zone the alias binding lives in. Empty means
    /// no binding is provisioned.
    #[builder(default)]
    pub dns_zone_ref: String,

    /// Minimum response TTL, in seconds.
    #[builder(default = 0)]
    pub ttl_min_secs: u64,

    /// Response TTL applied when the origin sends no freshness hint, in
    /// seconds.
    #[builder(default = 3600)]
    pub ttl_default_secs: u64,

    /// Maximum response TTL, in seconds.
    #[builder(default = 86_400)]
    pub ttl_max_secs: u64,

    /// Comma-separated served methods, a subset of GET, HEAD, OPTIONS.
    #[builder(default = String::from("GET,HEAD,OPTIONS"))]
    pub allowed_methods: String,

    /// Origin key of the document served in place of missing objects.
    #[builder(default = String::from(crate::fallback::DEFAULT_FALLBACK_DOCUMENT))]
    pub fallback_document: String,

    /// Origin status treated as "object missing" in addition to 404.
    #[builder(default = 403)]
    pub fallback_trigger_status: u16,

    /// Log level filter string.
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EdgeConfig {
    /// Build configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(listen) = std::env::var("EDGE_LISTEN") {
            config.listen = listen;
        }
        if let Ok(domain) = std::env::var("EDGE_DOMAIN") {
            config.domain = domain;
        }
        if let Ok(certificate_ref) = std::env::var("EDGE_CERTIFICATE_REF") {
            config.certificate_ref = certificate_ref;
        }
        if let Ok(dns_zone_ref) = std::env::var("EDGE_DNS_ZONE_REF") {
            config.dns_zone_ref = dns_zone_ref;
        }
        if let Ok(secs) = std::env::var("EDGE_TTL_MIN_SECS") {
            if let Ok(secs) = secs.parse() {
                config.ttl_min_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("EDGE_TTL_DEFAULT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.ttl_default_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("EDGE_TTL_MAX_SECS") {
            if let Ok(secs) = secs.parse() {
                config.ttl_max_secs = secs;
            }
        }
        if let Ok(methods) = std::env::var("EDGE_ALLOWED_METHODS") {
            config.allowed_methods = methods;
        }
        if let Ok(document) = std::env::var("EDGE_FALLBACK_DOCUMENT") {
            config.fallback_document = document;
        }
        if let Ok(status) = std::env::var("EDGE_FALLBACK_TRIGGER_STATUS") {
            if let Ok(status) = status.parse() {
                config.fallback_trigger_status = status;
            }
        }
        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }
        config
    }

    /// Validate the configuration before anything is provisioned from it.
    ///
    /// # Errors
    ///
    /// [`EdgeError::Config`] describing the first problem found.
    pub fn validate(&self) -> EdgeResult<()> {
        self.listen
            .parse::<SocketAddr>()
            .map_err(|_| EdgeError::Config(format!("invalid listen address {:?}", self.listen)))?;
        if self.ttl_min_secs > self.ttl_max_secs {
            return Err(EdgeError::Config(format!(
                "ttl bounds inverted: min {} > max {}",
                self.ttl_min_secs, self.ttl_max_secs
            )));
        }
        if self.ttl_default_secs < self.ttl_min_secs || self.ttl_default_secs > self.ttl_max_secs {
            return Err(EdgeError::Config(format!(
                "default ttl {} outside [{}, {}]",
                self.ttl_default_secs, self.ttl_min_secs, self.ttl_max_secs
            )));
        }
        self.methods()?;
        if !self.fallback_document.starts_with('/') {
            return Err(EdgeError::Config(format!(
                "fallback document must be an absolute origin key, got {:?}",
                self.fallback_document
            )));
        }
        let trigger = self.fallback_trigger_status()?;
        if !trigger.is_client_error() {
            return Err(EdgeError::Config(format!(
                "fallback trigger status {trigger} is not a client error"
            )));
        }
        Ok(())
    }

    /// The TTL policy these bounds describe.
    #[must_use]
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.ttl_min_secs),
            Duration::from_secs(self.ttl_default_secs),
            Duration::from_secs(self.ttl_max_secs),
        )
    }

    /// The parsed method set.
    ///
    /// # Errors
    ///
    /// [`EdgeError::Config`] when the configured list is unparseable or
    /// leaves the safe set.
    pub fn methods(&self) -> EdgeResult<AllowedMethods> {
        AllowedMethods::parse(&self.allowed_methods)
    }

    /// The fallback policy for missing origin objects.
    ///
    /// # Errors
    ///
    /// [`EdgeError::Config`] when the trigger status is not a valid HTTP
    /// status.
    pub fn fallback_policy(&self) -> EdgeResult<FallbackPolicy> {
        Ok(FallbackPolicy::new(
            self.fallback_document.clone(),
            self.fallback_trigger_status()?,
        ))
    }

    /// The alias binding attaching the configured domain to `target`.
    #[must_use]
    pub fn alias_binding(&self, target: impl Into<String>) -> AliasBinding {
        AliasBinding::new(self.domain.clone(), self.dns_zone_ref.clone(), target)
    }

    fn fallback_trigger_status(&self) -> EdgeResult<StatusCode> {
        StatusCode::from_u16(self.fallback_trigger_status).map_err(|_| {
            EdgeError::Config(format!(
                "invalid fallback trigger status {}",
                self.fallback_trigger_status
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
