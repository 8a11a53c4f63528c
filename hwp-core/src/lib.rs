//! Hwprint Core Library
//!
//! Hardware fingerprinting for Windows hosts: a map of nine keys describing
//! the machine, suitable for detecting that an instance has been cloned or
//! moved to different hardware.
//!
//! # Features
//!
//! - **Readiness Gate**: Bounded wait for the WMI service before any query
//! - **Dual Sources**: wmic command output on older releases, typed WMI
//!   records from Windows 10.0.26100 on
//! - **Stable Digests**: MD5 over raw output or canonical record bytes,
//!   base64 encoded
//! - **Fail Open**: A failing category leaves an empty value, never aborts
//!
//! # Module Structure
//!
//! - `source/` - Attribute sources (command-output, structured-query)
//! - `windows/` - Service control manager and WMI collaborators
//! - `engine` - Readiness gate, strategy selection and map assembly
//!
//! # Example
//!
//! ```no_run
//! use hwp_core::{system, EngineSettings};
//!
//! let config = EngineSettings::load(None)?.engine_config()?;
//! let fingerprint = system::collect(config)?.into_map();
//! println!("{}", serde_json::to_string(&fingerprint)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Grouped modules
pub mod source;
#[cfg(windows)]
pub mod windows;

// Standalone modules
pub mod category;
pub mod constants;
pub mod digest;
pub mod engine;
pub mod fingerprint;
pub mod host;
pub mod platform;
pub mod readiness;
pub mod records;
pub mod selector;
pub mod settings;
pub mod system;
pub mod version;

// Re-export error types
pub use hwp_error::{HwprintError, Result};

// Re-export engine types
pub use engine::{
    CategoryOutcome, Collaborators, Collection, EngineConfig, FingerprintEngine, HostFacts,
};
pub use fingerprint::FingerprintMap;

// Re-export collaborator traits and system implementations
pub use host::{HostIdentity, SystemHostIdentity};
pub use platform::{PlatformDetails, PlatformInfo, RecordPlatformInfo};
pub use readiness::{
    Pause, ReadinessPolicy, ReadinessWaiter, ServiceConnector, ServiceHandle, ServiceManager,
    ServiceState, ThreadPause,
};
pub use source::{AttributeSource, CommandRunner, RecordQuery, SystemCommandRunner};

// Re-export categories, records and strategy selection
pub use category::{Category, CategoryError};
pub use records::{RawRecord, RecordClass};
pub use selector::{AccessStrategy, StrategySelector};
pub use settings::{EngineSettings, SettingsOverrides};
pub use version::DottedVersion;

// Re-export digest helpers
pub use digest::{digest_bytes, digest_record};
