//! Instrumentation service readiness
//!
//! WMI queries against a service that has not finished starting fail in
//! unpredictable ways, so a fingerprint run first polls the service state and
//! only proceeds once it reports running. Readiness is checked once per run.

use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::constants::readiness;
use hwp_error::{HwprintError, Result};

// ============================================================================
// Collaborators
// ============================================================================

/// Service control state, as reported by the service manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceState::Stopped => "stopped",
            ServiceState::StartPending => "start pending",
            ServiceState::StopPending => "stop pending",
            ServiceState::Running => "running",
            ServiceState::ContinuePending => "continue pending",
            ServiceState::PausePending => "pause pending",
            ServiceState::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Entry point to the platform service manager
#[cfg_attr(test, mockall::automock)]
pub trait ServiceConnector {
    fn connect(&self) -> Result<Box<dyn ServiceManager>>;
}

/// Connected service manager
#[cfg_attr(test, mockall::automock)]
pub trait ServiceManager {
    fn open_service(&self, name: &str) -> Result<Box<dyn ServiceHandle>>;
}

/// Handle to one service
#[cfg_attr(test, mockall::automock)]
pub trait ServiceHandle {
    fn query_status(&self) -> Result<ServiceState>;
}

/// Suspends the calling thread between polls
#[cfg_attr(test, mockall::automock)]
pub trait Pause {
    fn pause(&self, duration: Duration);
}

/// Sleeps with `std::thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// ============================================================================
// Readiness Waiter
// ============================================================================

/// Retry budget for the readiness gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub service_name: String,
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            service_name: readiness::SERVICE_NAME.to_string(),
            attempts: readiness::ATTEMPTS,
            interval: readiness::INTERVAL,
        }
    }
}

impl ReadinessPolicy {
    /// Longest the gate can block
    pub fn budget(&self) -> Duration {
        self.interval * self.attempts
    }
}

pub struct ReadinessWaiter<'a> {
    policy: &'a ReadinessPolicy,
    pause: &'a dyn Pause,
}

impl<'a> ReadinessWaiter<'a> {
    pub fn new(policy: &'a ReadinessPolicy, pause: &'a dyn Pause) -> Self {
        Self { policy, pause }
    }

    /// Connect, open the service and wait for it to run
    pub fn wait_for_service(&self, connector: &dyn ServiceConnector) -> Result<()> {
        let name = &self.policy.service_name;
        debug!(
            service = %name,
            budget_secs = self.policy.budget().as_secs(),
            "Waiting for instrumentation service to be ready"
        );

        let manager = connector.connect()?;
        let handle = manager.open_service(name)?;
        self.wait(handle.as_ref())?;

        debug!(service = %name, "Instrumentation service is ready to be queried");
        Ok(())
    }

    /// Poll `handle` until it reports running or the budget runs out
    pub fn wait(&self, handle: &dyn ServiceHandle) -> Result<()> {
        for attempt in 1..=self.policy.attempts {
            match handle.query_status() {
                Ok(ServiceState::Running) => return Ok(()),
                Ok(state) => {
                    debug!(attempt, state = %state, "Service not running");
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Failed to get service status");
                }
            }
            self.pause.pause(self.policy.interval);
        }

        Err(HwprintError::ServiceUnavailable {
            service: self.policy.service_name.clone(),
            attempts: self.policy.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn query_error() -> HwprintError {
        HwprintError::ServiceQuery {
            service: "Winmgmt".to_string(),
            reason: "RPC server unavailable".to_string(),
        }
    }

    #[test]
    fn test_running_on_first_poll_does_not_pause() {
        let policy = ReadinessPolicy::default();
        let mut pause = MockPause::new();
        pause.expect_pause().times(0);
        let mut handle = MockServiceHandle::new();
        handle.expect_query_status().times(1).returning(|| Ok(ServiceState::Running));

        ReadinessWaiter::new(&policy, &pause).wait(&handle).unwrap();
    }

    #[test]
    fn test_errors_and_pending_states_are_retried() {
        let policy = ReadinessPolicy::default();
        let mut seq = Sequence::new();
        let mut handle = MockServiceHandle::new();
        handle
            .expect_query_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(query_error()));
        handle
            .expect_query_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(ServiceState::StartPending));
        handle
            .expect_query_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(ServiceState::Running));

        let mut pause = MockPause::new();
        pause
            .expect_pause()
            .withf(|d| *d == Duration::from_secs(15))
            .times(2)
            .return_const(());

        ReadinessWaiter::new(&policy, &pause).wait(&handle).unwrap();
    }

    #[test]
    fn test_budget_exhausted_after_five_polls() {
        let policy = ReadinessPolicy::default();
        let mut handle = MockServiceHandle::new();
        handle
            .expect_query_status()
            .times(5)
            .returning(|| Ok(ServiceState::Stopped));
        let mut pause = MockPause::new();
        pause
            .expect_pause()
            .withf(|d| *d == Duration::from_secs(15))
            .times(5)
            .return_const(());

        let err = ReadinessWaiter::new(&policy, &pause).wait(&handle).unwrap_err();
        match err {
            HwprintError::ServiceUnavailable { service, attempts } => {
                assert_eq!(service, "Winmgmt");
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(policy.budget(), Duration::from_secs(75));
    }

    #[test]
    fn test_connect_failure_is_returned() {
        let policy = ReadinessPolicy::default();
        let pause = MockPause::new();
        let mut connector = MockServiceConnector::new();
        connector
            .expect_connect()
            .returning(|| Err(HwprintError::ServiceConnect("access denied".into())));

        let err = ReadinessWaiter::new(&policy, &pause)
            .wait_for_service(&connector)
            .unwrap_err();
        assert!(matches!(err, HwprintError::ServiceConnect(_)));
    }

    #[test]
    fn test_opens_configured_service() {
        let policy = ReadinessPolicy {
            service_name: "winmgmt-test".to_string(),
            attempts: 1,
            interval: Duration::ZERO,
        };
        let pause = MockPause::new();
        let mut connector = MockServiceConnector::new();
        connector.expect_connect().times(1).returning(|| {
            let mut manager = MockServiceManager::new();
            manager
                .expect_open_service()
                .withf(|name| name.to_string() == "winmgmt-test")
                .times(1)
                .returning(|_| {
                    let mut handle = MockServiceHandle::new();
                    handle.expect_query_status().returning(|| Ok(ServiceState::Running));
                    Ok(Box::new(handle) as Box<dyn ServiceHandle>)
                });
            Ok(Box::new(manager) as Box<dyn ServiceManager>)
        });

        ReadinessWaiter::new(&policy, &pause)
            .wait_for_service(&connector)
            .unwrap();
    }
}
