//! Windows collaborators
//!
//! Service control manager access through `windows-service` and WMI record
//! queries through `wmi`.

mod service;
mod wmi_query;

pub use service::WindowsServiceConnector;
pub use wmi_query::WmiRecordQuery;
