//! CLI configuration (xyk.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use xyk_model::{DEFAULT_FEE_BPS, MAX_FEE_BPS};

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "xyk.toml";

pub const DEFAULT_STATE_FILE: &str = "xyk-state.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XykConfig {
    /// JSON file holding the pool record and holder ledger
    pub state_path: PathBuf,
    /// Fee used by `init` when no `--fee-bps` is passed
    pub fee_bps: u16,
}

impl Default for XykConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            fee_bps: DEFAULT_FEE_BPS,
        }
    }
}

impl XykConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `xyk.toml` is read if present
    /// and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: XykConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fee_bps > MAX_FEE_BPS {
            anyhow::bail!(
                "Configured fee_bps {} exceeds maximum {}",
                self.fee_bps,
                MAX_FEE_BPS
            );
        }
        Ok(())
    }

    /// Apply command-line overrides.
    pub fn with_state_path(mut self, state_path: Option<PathBuf>) -> Self {
        if let Some(path) = state_path {
            self.state_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = XykConfig::default();
        assert_eq!(config.state_path, PathBuf::from("xyk-state.json"));
        assert_eq!(config.fee_bps, 30);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_config("fee_bps = 5\n");
        let config = XykConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.fee_bps, 5);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_FILE));
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config("state_path = \"/tmp/pool.json\"\nfee_bps = 100\n");
        let config = XykConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.state_path, PathBuf::from("/tmp/pool.json"));
        assert_eq!(config.fee_bps, 100);
    }

    #[test]
    fn test_fee_above_max_rejected() {
        let file = write_config("fee_bps = 1001\n");
        let err = XykConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config("fees = 5\n");
        assert!(XykConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_rejected() {
        let err = XykConfig::load(Some(Path::new("/nonexistent/xyk.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_state_path_override() {
        let config = XykConfig::default().with_state_path(Some(PathBuf::from("other.json")));
        assert_eq!(config.state_path, PathBuf::from("other.json"));

        let config = XykConfig::default().with_state_path(None);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_FILE));
    }
}
