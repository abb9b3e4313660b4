//! Domain-to-endpoint alias bindings.
//!
//! The public domain reaches the edge through a DNS alias record owned by
//! an external DNS collaborator. The core neither resolves nor publishes
//! records; it validates the desired state once, at provisioning time.
//! A binding must be a plain alias: apex domains are fine, health-based
//! failover and weighted routing are not. Request handling never consults
//! this record.

use serde::{Deserialize, Serialize};

/// Declarative record binding a public domain to the edge endpoint.
///
/// Serialized to the provisioning layer in camelCase, matching the rest of
/// the configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasBinding {
    /// Public domain name. May be the zone apex; aliases work where CNAMEs
    /// cannot.
    pub domain: String,
    /// Reference to the DNS zone the record lives in.
    pub zone_ref: String,
    /// The edge endpoint address the alias resolves to.
    pub target: String,
    /// Whether the DNS layer should health-check the target before
    /// answering. Alias bindings here are unconditional; this must stay
    /// `false`.
    #[serde(default)]
    pub evaluate_target_health: bool,
    /// Routing weight for weighted record sets. Unsupported; must stay
    /// `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Why an [`AliasBinding`] failed provisioning-time validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// The domain is empty or not a bare domain name.
    #[error("binding domain is not a bare domain name: {0:?}")]
    InvalidDomain(String),
    /// No DNS zone reference was provided.
    #[error("binding zone reference is empty")]
    EmptyZoneRef,
    /// No target endpoint was provided.
    #[error("binding target endpoint is empty")]
    EmptyTarget,
    /// Health evaluation was requested.
    #[error("alias bindings are unconditional; target health evaluation is not supported")]
    HealthEvaluation,
    /// A routing weight was requested.
    #[error("alias bindings are unconditional; weighted routing is not supported")]
    Weighted,
}

impl AliasBinding {
    /// A plain alias binding `domain` to `target` in `zone_ref`.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        zone_ref: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            zone_ref: zone_ref.into(),
            target: target.into(),
            evaluate_target_health: false,
            weight: None,
        }
    }

    /// Validate the desired state before handing it to the DNS layer.
    ///
    /// Runs once at provisioning. Nothing on the request path depends on
    /// the outcome.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), BindingError> {
        if !is_bare_domain(&self.domain) {
            return Err(BindingError::InvalidDomain(self.domain.clone()));
        }
        if self.zone_ref.is_empty() {
            return Err(BindingError::EmptyZoneRef);
        }
        if self.target.is_empty() {
            return Err(BindingError::EmptyTarget);
        }
        if self.evaluate_target_health {
            return Err(BindingError::HealthEvaluation);
        }
        if self.weight.is_some() {
            return Err(BindingError::Weighted);
        }
        Ok(())
    }
}

/// A bare domain name: dot-separated non-empty labels of alphanumerics and
/// hyphens. No scheme, port, path, or whitespace.
fn is_bare_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> AliasBinding {
        AliasBinding::new("example.com", "zone-3f1c", "edge.internal:8480")
    }

    #[test]
    fn test_should_accept_apex_domain() {
        // The whole point of an alias over a CNAME: the zone apex works.
        binding().validate().expect("apex binding should validate");
    }

    #[test]
    fn test_should_accept_subdomain() {
        let mut b = binding();
        b.domain = "www.example.com".to_owned();
        b.validate().expect("subdomain binding should validate");
    }

    #[test]
    fn test_should_reject_malformed_domains() {
        let cases = [
            "",
            "https://example.com",
            "example.com:443",
            "example..com",
            ".example.com",
            "exa mple.com",
            "example.com/path",
        ];
        for domain in cases {
            let mut b = binding();
            b.domain = domain.to_owned();
            assert!(
                matches!(b.validate(), Err(BindingError::InvalidDomain(_))),
                "domain {domain:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_should_require_zone_and_target() {
        let mut no_zone = binding();
        no_zone.zone_ref = String::new();
        assert_eq!(no_zone.validate(), Err(BindingError::EmptyZoneRef));

        let mut no_target = binding();
        no_target.target = String::new();
        assert_eq!(no_target.validate(), Err(BindingError::EmptyTarget));
    }

    #[test]
    fn test_should_reject_health_evaluation() {
        let mut b = binding();
        b.evaluate_target_health = true;
        assert_eq!(b.validate(), Err(BindingError::HealthEvaluation));
    }

    #[test]
    fn test_should_reject_weighted_routing() {
        let mut b = binding();
        b.weight = Some(50);
        assert_eq!(b.validate(), Err(BindingError::Weighted));
    }

    #[test]
    fn test_should_serialize_in_camel_case() {
        let json = serde_json::to_value(binding()).expect("binding should serialize");
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["zoneRef"], "zone-3f1c");
        assert_eq!(json["evaluateTargetHealth"], false);
        // Unset weight stays off the wire entirely.
        assert!(json.get("weight").is_none());
    }
}
