//! Fingerprint run against the local machine
//!
//! Wires the engine to the real collaborators. Only Windows exposes the
//! service control manager and WMI; elsewhere a run is refused up front.

use crate::engine::{Collection, EngineConfig};
use hwp_error::Result;

/// Collect the fingerprint of the local machine
#[cfg(windows)]
pub fn collect(config: EngineConfig) -> Result<Collection> {
    use crate::engine::{Collaborators, FingerprintEngine};
    use crate::host::SystemHostIdentity;
    use crate::platform::RecordPlatformInfo;
    use crate::readiness::ThreadPause;
    use crate::source::SystemCommandRunner;
    use crate::windows::{WindowsServiceConnector, WmiRecordQuery};

    let service = WindowsServiceConnector;
    let query = WmiRecordQuery::new()?;
    let platform = RecordPlatformInfo::new(&query);
    let runner = SystemCommandRunner;
    let host = SystemHostIdentity::new(&runner);
    let pause = ThreadPause;

    let engine = FingerprintEngine::new(
        Collaborators {
            service: &service,
            platform: &platform,
            runner: &runner,
            query: &query,
            host: &host,
            pause: &pause,
        },
        config,
    );
    engine.collect()
}

/// Collect the fingerprint of the local machine
#[cfg(not(windows))]
pub fn collect(_config: EngineConfig) -> Result<Collection> {
    Err(hwp_error::HwprintError::NotSupported(format!(
        "hardware fingerprinting requires Windows (running on {})",
        std::env::consts::OS
    )))
}
