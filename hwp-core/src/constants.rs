//! Constants and configuration defaults for hwprint
//!
//! Centralizes fingerprint keys, service names, retry budgets and paths.
//! Settings may override the tunable values; the keys are fixed.

use std::time::Duration;

/// Fingerprint map keys
///
/// Downstream drift detection compares maps key by key, so these strings
/// must never change.
pub mod keys {
    /// SMBIOS system UUID (Win32_ComputerSystemProduct)
    pub const UUID: &str = "uuid";
    pub const PROCESSOR: &str = "processor-hash";
    pub const MEMORY: &str = "memory-hash";
    pub const BIOS: &str = "bios-hash";
    pub const SYSTEM: &str = "system-hash";
    pub const HOSTNAME: &str = "hostname-info";
    pub const IP_ADDRESS: &str = "ip-address";
    pub const MAC_ADDRESS: &str = "macaddr-info";
    pub const DISK: &str = "disk-info";

    /// Every key a fingerprint map carries
    pub const ALL: [&str; 9] = [
        UUID,
        PROCESSOR,
        MEMORY,
        BIOS,
        SYSTEM,
        HOSTNAME,
        IP_ADDRESS,
        MAC_ADDRESS,
        DISK,
    ];
}

/// Instrumentation service readiness
pub mod readiness {
    use super::*;

    /// Windows Management Instrumentation service
    pub const SERVICE_NAME: &str = "Winmgmt";

    /// Status polls before giving up
    pub const ATTEMPTS: u32 = 5;

    /// Pause after each poll that did not observe a running service
    pub const INTERVAL: Duration = Duration::from_secs(15);

    /// Same as [`INTERVAL`], for settings files
    pub const INTERVAL_SECS: u64 = 15;
}

/// Platform version thresholds
pub mod version {
    /// Windows Server 2025; at or after this the structured-query backend is used
    pub const STRUCTURED_QUERY_THRESHOLD: &str = "10.0.26100";

    /// Win32_OperatingSystem.OperatingSystemSKU values for Nano Server
    pub const SKU_DATACENTER_NANO_SERVER: u32 = 143;
    pub const SKU_STANDARD_NANO_SERVER: u32 = 144;

    /// Appended to the version string on Nano Server
    pub const NANO_SUFFIX: &str = "nano";

    pub const PLATFORM_FAMILY_WINDOWS: &str = "windows";
}

/// System paths
pub mod paths {
    use std::path::PathBuf;

    /// Environment variable holding the Windows directory
    pub const WINDIR_ENV: &str = "WINDIR";

    /// Used when WINDIR is unset
    pub const DEFAULT_WINDIR: &str = r"C:\Windows";

    /// Path of the WMI command-line utility below the Windows directory
    pub const WMIC_RELATIVE: [&str; 3] = ["System32", "wbem", "wmic.exe"];

    /// MAC address listing utility (Windows)
    pub const GETMAC: &str = "getmac";

    /// Per-interface hardware address (Linux sysfs)
    pub const SYS_CLASS_NET: &str = "/sys/class/net";

    /// Settings directory name below the user config directory
    pub const CONFIG_DIR_NAME: &str = "hwprint";

    /// Settings file name
    pub const SETTINGS_FILE: &str = "settings.json";

    /// Resolve the wmic utility from a Windows directory
    pub fn wmic_under(windir: &str) -> PathBuf {
        let mut path = PathBuf::from(windir);
        for part in WMIC_RELATIVE {
            path.push(part);
        }
        path
    }

    /// Resolve the wmic utility from the WINDIR environment variable
    pub fn wmic_path() -> PathBuf {
        let windir = std::env::var(WINDIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WINDIR.to_string());
        wmic_under(&windir)
    }

    /// Default settings file location (`<config_dir>/hwprint/settings.json`)
    pub fn default_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE))
    }
}
