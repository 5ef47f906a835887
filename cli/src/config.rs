//! CLI Configuration

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use rov_validator::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Values read from `~/.rov/config[.<profile>].toml`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roas: Option<PathBuf>,
    pub slurm: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub store: StoreConfig,
}

impl Config {
    /// Load the profile's file, or defaults when it does not exist
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir().context("cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".rov").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rov_validator::CandidateOrder;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            roas = "/var/lib/rpki/vrps.json"
            slurm = "/etc/rov/local.slurm.json"
            format = "json"

            [store]
            candidate_limit = 32
            candidate_order = "least_specific_first"
            "#,
        )
        .unwrap();
        assert_eq!(config.roas, Some(PathBuf::from("/var/lib/rpki/vrps.json")));
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.store.candidate_limit.get(), 32);
        assert_eq!(
            config.store.candidate_order,
            CandidateOrder::LeastSpecificFirst
        );
    }

    #[test]
    fn test_partial_store_keeps_defaults() {
        let config: Config = toml::from_str("[store]\ncandidate_limit = 8\n").unwrap();
        assert!(config.roas.is_none());
        assert_eq!(config.store.candidate_limit.get(), 8);
        assert_eq!(
            config.store.candidate_order,
            CandidateOrder::MostSpecificFirst
        );
    }

    #[test]
    fn test_zero_candidate_limit_rejected() {
        assert!(toml::from_str::<Config>("[store]\ncandidate_limit = 0\n").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/rov/config.toml")).unwrap();
        assert!(config.slurm.is_none());
        assert_eq!(config.store, StoreConfig::default());
    }
}
