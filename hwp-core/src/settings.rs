//! Engine Settings
//!
//! Optional JSON settings stored in ~/.config/hwprint/settings.json. Every
//! field has a default, so an empty object and a missing file both produce
//! the stock policy: poll Winmgmt five times 15 seconds apart and pick the
//! access strategy from the platform version.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{paths, readiness, version};
use crate::engine::EngineConfig;
use crate::readiness::ReadinessPolicy;
use crate::selector::{AccessStrategy, StrategySelector};
use crate::version::DottedVersion;
use hwp_error::{HwprintError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Instrumentation service polled by the readiness gate
    pub service_name: String,
    pub readiness_attempts: u32,
    pub readiness_interval_secs: u64,
    /// Platform version from which the structured-query backend is used
    pub version_threshold: String,
    /// Forced access strategy; `None` selects from the platform version
    pub strategy: Option<AccessStrategy>,
    /// wmic utility; `None` derives it from WINDIR
    pub wmic_path: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            service_name: readiness::SERVICE_NAME.to_string(),
            readiness_attempts: readiness::ATTEMPTS,
            readiness_interval_secs: readiness::INTERVAL_SECS,
            version_threshold: version::STRUCTURED_QUERY_THRESHOLD.to_string(),
            strategy: None,
            wmic_path: None,
        }
    }
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `Some(None)` forces automatic selection even if the file pins a strategy
    pub strategy: Option<Option<AccessStrategy>>,
    pub readiness_attempts: Option<u32>,
}

impl EngineSettings {
    /// Load settings
    ///
    /// With `path` the file must exist. Without it the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match paths::default_settings_path() {
                Some(default) if default.exists() => default,
                Some(default) => {
                    debug!("No settings file found at {:?}, using defaults", default);
                    return Ok(Self::default());
                }
                None => {
                    debug!("No config directory available, using default settings");
                    return Ok(Self::default());
                }
            },
        };

        let contents = fs::read_to_string(&path).map_err(|source| HwprintError::FileRead {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_json(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse and validate a settings document
    pub fn from_json(contents: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(HwprintError::invalid_config("service_name", "must not be empty"));
        }
        if self.readiness_attempts == 0 {
            return Err(HwprintError::invalid_config(
                "readiness_attempts",
                "must be at least 1",
            ));
        }
        DottedVersion::parse(&self.version_threshold).map_err(|e| {
            HwprintError::invalid_config("version_threshold", e.to_string())
        })?;
        Ok(())
    }

    /// Apply command-line values and re-validate
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Result<Self> {
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        if let Some(attempts) = overrides.readiness_attempts {
            self.readiness_attempts = attempts;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            service_name: self.service_name.clone(),
            attempts: self.readiness_attempts,
            interval: Duration::from_secs(self.readiness_interval_secs),
        }
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        let selector = StrategySelector::new(&self.version_threshold)?.forced(self.strategy);
        let wmic_path = self.wmic_path.clone().unwrap_or_else(paths::wmic_path);
        Ok(EngineConfig {
            readiness: self.readiness_policy(),
            selector,
            wmic_path,
        })
    }
}
