use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::estimation::RateTable;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub rates: RateTable,
}

impl Config {
    pub fn pertplan_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".pertplan"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::pertplan_dir()?.join("pertplan.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::pertplan_dir()?.join("pertplan.log"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config");
        if !path.exists() {
            tracing::debug!("config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        tracing::debug!(
            roles = config.rates.roles.len(),
            default_rate = config.rates.default_rate,
            "config loaded"
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::debug!(dir = %parent.display(), "creating config directory");
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Rates are trusted configuration, so a bad one is an error rather
    /// than a tolerated anomaly.
    pub fn validate(&self) -> Result<()> {
        let valid = |rate: f64| rate.is_finite() && rate >= 0.0;
        if !valid(self.rates.default_rate) {
            return Err(Error::Validation(format!(
                "default_rate must be a non-negative number, got {}",
                self.rates.default_rate
            )));
        }
        if let Some((role, rate)) = self.rates.roles.iter().find(|(_, r)| !valid(**r)) {
            return Err(Error::Validation(format!(
                "rate for role '{}' must be a non-negative number, got {}",
                role, rate
            )));
        }
        Ok(())
    }
}
