//! CLI configuration file.

use coldchain_core::EngineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of `coldchain.toml`.
///
/// ```toml
/// admin = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
/// enforce_monotonic_status = true
/// signature_scheme = "raw"
/// journal = "ledger.ccj"
/// sync = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    #[serde(default = "default_journal")]
    pub journal: PathBuf,
    #[serde(default)]
    pub sync: bool,
}

fn default_journal() -> PathBuf {
    PathBuf::from("ledger.ccj")
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: CliConfig = toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // A relative journal path is taken relative to the config file.
        if config.journal.is_relative() {
            if let Some(dir) = path.parent() {
                config.journal = dir.join(&config.journal);
            }
        }
        tracing::debug!(
            config = %path.display(),
            journal = %config.journal.display(),
            "loaded config"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldchain_core::SignatureScheme;

    #[test]
    fn journal_resolves_next_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coldchain.toml");
        std::fs::write(
            &path,
            concat!(
                "admin = \"0x0101010101010101010101010101010101010101\"\n",
                "signature_scheme = \"eth-personal\"\n",
            ),
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.journal, dir.path().join("ledger.ccj"));
        assert!(!config.sync);
        assert_eq!(config.engine.signature_scheme, SignatureScheme::EthPersonal);
        assert!(!config.engine.enforce_monotonic_status);
    }

    #[test]
    fn missing_admin_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coldchain.toml");
        std::fs::write(&path, "journal = \"x.ccj\"\n").unwrap();
        assert!(matches!(
            CliConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
