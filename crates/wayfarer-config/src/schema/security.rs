//! Security configuration types.

use serde::{Deserialize, Serialize};

/// How certificate errors reported by a page are resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CertificatePolicy {
    /// Refuse the connection.
    #[default]
    Reject,
    /// Proceed despite the error. Intended for local development only.
    Accept,
}

impl CertificatePolicy {
    pub fn allows(self) -> bool {
        matches!(self, Self::Accept)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub certificate_policy: CertificatePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_policy_defaults_to_reject() {
        let config = SecurityConfig::default();
        assert_eq!(config.certificate_policy, CertificatePolicy::Reject);
        assert!(!config.certificate_policy.allows());
    }

    #[test]
    fn certificate_policy_from_toml() {
        let config: SecurityConfig = toml::from_str(r#"certificate_policy = "accept""#).unwrap();
        assert!(config.certificate_policy.allows());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result: Result<SecurityConfig, _> = toml::from_str(r#"certificate_policy = "maybe""#);
        assert!(result.is_err());
    }
}
