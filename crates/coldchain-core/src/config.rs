use coldchain_canonical::Identity;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoreError;
use crate::signature::SignatureScheme;

/// Settings fixed when a ledger is created.
///
/// Loaded from TOML:
///
/// ```toml
/// admin = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
/// enforce_monotonic_status = true
/// signature_scheme = "eth-personal"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The only identity allowed to mutate the ledger.
    pub admin: Identity,
    /// Reject certificates whose status is earlier than their batch's latest one.
    #[serde(default)]
    pub enforce_monotonic_status: bool,
    /// Digest that stored signatures are expected to cover.
    #[serde(default)]
    pub signature_scheme: SignatureScheme,
}

impl EngineConfig {
    /// Default policy with `admin` as the administrator.
    pub fn new(admin: Identity) -> Self {
        Self {
            admin,
            enforce_monotonic_status: false,
            signature_scheme: SignatureScheme::default(),
        }
    }

    /// Turns the per-batch monotonic status policy on or off.
    pub fn with_monotonic_status(mut self, enforce: bool) -> Self {
        self.enforce_monotonic_status = enforce;
        self
    }

    /// Selects the signing convention.
    pub fn with_signature_scheme(mut self, scheme: SignatureScheme) -> Self {
        self.signature_scheme = scheme;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, CoreError> {
        toml::from_str(source).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_omitted_keys() {
        let config =
            EngineConfig::from_toml_str(r#"admin = "0x0101010101010101010101010101010101010101""#)
                .unwrap();
        assert_eq!(config, EngineConfig::new(Identity::from_bytes([1; 20])));
    }

    #[test]
    fn full_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            admin = "0x0101010101010101010101010101010101010101"
            enforce_monotonic_status = true
            signature_scheme = "eth-personal"
            "#,
        )
        .unwrap();
        assert!(config.enforce_monotonic_status);
        assert_eq!(config.signature_scheme, SignatureScheme::EthPersonal);
    }

    #[test]
    fn bad_admin_is_a_config_error() {
        let err = EngineConfig::from_toml_str(r#"admin = "alice""#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
