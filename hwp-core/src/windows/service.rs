use windows_service::service::{Service, ServiceAccess, ServiceState as ScmState};
use windows_service::service_manager::{ServiceManager as Scm, ServiceManagerAccess};

use crate::readiness::{ServiceConnector, ServiceHandle, ServiceManager, ServiceState};
use hwp_error::{HwprintError, Result};

/// Connects to the local service control manager
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsServiceConnector;

impl ServiceConnector for WindowsServiceConnector {
    fn connect(&self) -> Result<Box<dyn ServiceManager>> {
        let scm = Scm::local_computer(None::<&str>, ServiceManagerAccess::CONNECT)
            .map_err(|e| HwprintError::ServiceConnect(e.to_string()))?;
        Ok(Box::new(LocalServiceManager { scm }))
    }
}

struct LocalServiceManager {
    scm: Scm,
}

impl ServiceManager for LocalServiceManager {
    fn open_service(&self, name: &str) -> Result<Box<dyn ServiceHandle>> {
        let service = self
            .scm
            .open_service(name, ServiceAccess::QUERY_STATUS)
            .map_err(|e| HwprintError::ServiceOpen {
                service: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(LocalService {
            name: name.to_string(),
            service,
        }))
    }
}

struct LocalService {
    name: String,
    service: Service,
}

impl ServiceHandle for LocalService {
    fn query_status(&self) -> Result<ServiceState> {
        let status = self
            .service
            .query_status()
            .map_err(|e| HwprintError::ServiceQuery {
                service: self.name.clone(),
                reason: e.to_string(),
            })?;
        Ok(map_state(status.current_state))
    }
}

fn map_state(state: ScmState) -> ServiceState {
    match state {
        ScmState::Stopped => ServiceState::Stopped,
        ScmState::StartPending => ServiceState::StartPending,
        ScmState::StopPending => ServiceState::StopPending,
        ScmState::Running => ServiceState::Running,
        ScmState::ContinuePending => ServiceState::ContinuePending,
        ScmState::PausePending => ServiceState::PausePending,
        ScmState::Paused => ServiceState::Paused,
    }
}
