//! Unified error handling for hwprint
//!
//! This crate provides the single error type used across all hwprint components.
//! Fatal and non-fatal failures share the type; whether a failure aborts a
//! fingerprint run is decided by the caller, see [`HwprintError::is_fatal`].

use std::io;
use std::path::PathBuf;

/// Result type alias using HwprintError
pub type Result<T> = std::result::Result<T, HwprintError>;

/// Unified error type for all hwprint operations
#[derive(thiserror::Error, Debug)]
pub enum HwprintError {
    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Instrumentation Service Errors (readiness gate)
    // ============================================================================
    #[error("Failed to connect to service manager: {0}")]
    ServiceConnect(String),

    #[error("Failed to open service {service}: {reason}")]
    ServiceOpen {
        service: String,
        reason: String,
    },

    #[error("Failed to query status of service {service}: {reason}")]
    ServiceQuery {
        service: String,
        reason: String,
    },

    #[error("Service {service} did not reach running state after {attempts} attempts")]
    ServiceUnavailable {
        service: String,
        attempts: u32,
    },

    // ============================================================================
    // Platform Version Errors
    // ============================================================================
    #[error("Failed to determine platform version: {0}")]
    VersionDetection(String),

    #[error("Invalid version string {version:?}: {reason}")]
    InvalidVersion {
        version: String,
        reason: String,
    },

    // ============================================================================
    // Attribute Source Errors
    // ============================================================================
    #[error("Command {command} failed: {reason}")]
    CommandFailed {
        command: String,
        reason: String,
    },

    #[error("Query for {class} failed: {reason}")]
    QueryFailed {
        class: String,
        reason: String,
    },

    #[error("Query for {class} returned no records")]
    NoRecords {
        class: String,
    },

    #[error("Query for {expected} returned a {actual} record")]
    UnexpectedRecord {
        expected: String,
        actual: String,
    },

    #[error("Failed to encode {what}: {reason}")]
    Encoding {
        what: String,
        reason: String,
    },

    #[error("Host identity lookup failed: {0}")]
    HostIdentity(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl HwprintError {
    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a command failure for the given program
    pub fn command(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create a query failure for the given record class
    pub fn query(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Create an encoding failure
    pub fn encoding(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a host identity failure
    pub fn host(msg: impl Into<String>) -> Self {
        Self::HostIdentity(msg.into())
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Errors that abort a whole fingerprint run rather than a single category
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ServiceConnect(_) | Self::ServiceOpen { .. } | Self::ServiceUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_errors_are_fatal() {
        let timeout = HwprintError::ServiceUnavailable {
            service: "Winmgmt".to_string(),
            attempts: 5,
        };
        assert!(timeout.is_fatal());
        assert!(HwprintError::ServiceConnect("access denied".into()).is_fatal());
    }

    #[test]
    fn test_category_errors_are_not_fatal() {
        assert!(!HwprintError::command("wmic.exe", "exit status 1").is_fatal());
        assert!(!HwprintError::NoRecords { class: "Win32_DiskDrive".into() }.is_fatal());
        assert!(!HwprintError::VersionDetection("no data".into()).is_fatal());
    }

    #[test]
    fn test_display_names_service_and_attempts() {
        let err = HwprintError::ServiceUnavailable {
            service: "Winmgmt".to_string(),
            attempts: 5,
        };
        assert_eq!(
            err.to_string(),
            "Service Winmgmt did not reach running state after 5 attempts"
        );
    }
}
