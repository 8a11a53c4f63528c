//! Platform information
//!
//! Name, version and family of the running platform. On Windows these come
//! from `Win32_OperatingSystem` through the same record query the
//! structured-query backend uses.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::constants::version::{
    NANO_SUFFIX, PLATFORM_FAMILY_WINDOWS, SKU_DATACENTER_NANO_SERVER, SKU_STANDARD_NANO_SERVER,
};
use crate::records::{OperatingSystem, RawRecord, RecordClass};
use crate::source::RecordQuery;
use hwp_error::{HwprintError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDetails {
    pub name: String,
    pub version: String,
    pub family: String,
}

/// Platform Info collaborator
#[cfg_attr(test, mockall::automock)]
pub trait PlatformInfo {
    fn platform_details(&self) -> Result<PlatformDetails>;

    fn platform_version(&self) -> Result<String> {
        Ok(self.platform_details()?.version)
    }
}

/// Platform info read from `Win32_OperatingSystem`
pub struct RecordPlatformInfo<'a> {
    query: &'a dyn RecordQuery,
}

impl<'a> RecordPlatformInfo<'a> {
    pub fn new(query: &'a dyn RecordQuery) -> Self {
        Self { query }
    }

    fn operating_system(&self) -> Result<OperatingSystem> {
        match self.query.query_first(RecordClass::OperatingSystem) {
            Ok(RawRecord::OperatingSystem(os)) => Ok(os),
            Ok(other) => Err(HwprintError::UnexpectedRecord {
                expected: RecordClass::OperatingSystem.to_string(),
                actual: other.class().to_string(),
            }),
            Err(e) => {
                error!(error = %e, "Failed to fetch OS details");
                Err(HwprintError::VersionDetection(e.to_string()))
            }
        }
    }
}

impl PlatformInfo for RecordPlatformInfo<'_> {
    fn platform_details(&self) -> Result<PlatformDetails> {
        let os = self.operating_system()?;

        let mut version = os.version.trim().to_string();
        if is_nano_server(os.operating_system_sku) {
            version.push_str(NANO_SUFFIX);
        }
        debug!(
            caption = %os.caption,
            version = %version,
            sku = os.operating_system_sku,
            "Detected platform"
        );

        Ok(PlatformDetails {
            name: os.caption.trim().to_string(),
            version,
            family: PLATFORM_FAMILY_WINDOWS.to_string(),
        })
    }
}

pub fn is_nano_server(sku: u32) -> bool {
    sku == SKU_DATACENTER_NANO_SERVER || sku == SKU_STANDARD_NANO_SERVER
}
