//! Strategy selection
//!
//! Picks the attribute source once per fingerprint run from the platform
//! version. wmic is deprecated and absent from Windows Server 2025 onwards, so
//! those hosts use the structured-query backend; older hosts keep the
//! command-output backend. Any doubt about the version falls back to
//! command-output, which works everywhere wmic still ships.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::constants::version::STRUCTURED_QUERY_THRESHOLD;
use crate::platform::PlatformInfo;
use crate::version::DottedVersion;
use hwp_error::{HwprintError, Result};

/// Attribute data-access strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessStrategy {
    /// Run wmic and hash its text output
    CommandOutput,
    /// Query WMI for a typed record and hash its canonical encoding
    StructuredQuery,
}

impl AccessStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStrategy::CommandOutput => "command-output",
            AccessStrategy::StructuredQuery => "structured-query",
        }
    }
}

impl fmt::Display for AccessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessStrategy {
    type Err = HwprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "command-output" | "wmic" => Ok(AccessStrategy::CommandOutput),
            "structured-query" | "wql" => Ok(AccessStrategy::StructuredQuery),
            other => Err(HwprintError::invalid_config(
                "strategy",
                format!("unknown access strategy {:?}", other),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrategySelector {
    threshold: DottedVersion,
    forced: Option<AccessStrategy>,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            forced: None,
        }
    }
}

fn default_threshold() -> DottedVersion {
    // The constant is a plain three-component version
    DottedVersion::parse(STRUCTURED_QUERY_THRESHOLD)
        .expect("threshold constant is a valid version")
}

impl StrategySelector {
    pub fn new(threshold: &str) -> Result<Self> {
        Ok(Self {
            threshold: DottedVersion::parse(threshold)?,
            forced: None,
        })
    }

    /// Skip detection and always return `strategy`
    pub fn forced(mut self, strategy: Option<AccessStrategy>) -> Self {
        self.forced = strategy;
        self
    }

    pub fn threshold(&self) -> &DottedVersion {
        &self.threshold
    }

    /// Strategy for a known version string
    pub fn for_version(&self, version: &str) -> Result<AccessStrategy> {
        let parsed = DottedVersion::parse(version)?;
        if parsed >= self.threshold {
            Ok(AccessStrategy::StructuredQuery)
        } else {
            Ok(AccessStrategy::CommandOutput)
        }
    }

    /// Strategy for the running platform, failing open to command-output
    pub fn select(&self, platform: &dyn PlatformInfo) -> AccessStrategy {
        if let Some(strategy) = self.forced {
            debug!(strategy = %strategy, "Using configured access strategy");
            return strategy;
        }

        let version = match platform.platform_version() {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Failed to determine platform version, using command-output");
                return AccessStrategy::CommandOutput;
            }
        };

        match self.for_version(&version) {
            Ok(strategy) => {
                debug!(
                    version = %version,
                    threshold = %self.threshold,
                    strategy = %strategy,
                    "Selected access strategy"
                );
                strategy
            }
            Err(e) => {
                warn!(
                    version = %version,
                    error = %e,
                    "Unparseable platform version, using command-output"
                );
                AccessStrategy::CommandOutput
            }
        }
    }
}
