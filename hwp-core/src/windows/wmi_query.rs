use serde::de::DeserializeOwned;
use tracing::debug;
use wmi::{COMLibrary, WMIConnection};

use crate::records::*;
use crate::source::RecordQuery;
use hwp_error::{HwprintError, Result};

/// Record query over a WMI connection to `root\cimv2`
///
/// COM is initialized once, on the thread that creates the query; the query
/// must be used from that thread.
pub struct WmiRecordQuery {
    connection: WMIConnection,
}

impl WmiRecordQuery {
    pub fn new() -> Result<Self> {
        let com = COMLibrary::new()
            .map_err(|e| HwprintError::query("root\\cimv2", format!("COM initialization: {}", e)))?;
        let connection = WMIConnection::new(com)
            .map_err(|e| HwprintError::query("root\\cimv2", format!("connection: {}", e)))?;
        Ok(Self { connection })
    }

    fn first<T: DeserializeOwned>(&self, class: RecordClass) -> Result<T> {
        let mut records: Vec<T> = self
            .connection
            .query()
            .map_err(|e| HwprintError::query(class.class_name(), e.to_string()))?;
        debug!(class = %class, count = records.len(), "WMI query returned records");

        if records.is_empty() {
            return Err(HwprintError::NoRecords {
                class: class.to_string(),
            });
        }
        Ok(records.swap_remove(0))
    }
}

impl RecordQuery for WmiRecordQuery {
    fn query_first(&self, class: RecordClass) -> Result<RawRecord> {
        Ok(match class {
            RecordClass::ComputerSystemProduct => {
                RawRecord::ComputerSystemProduct(self.first::<ComputerSystemProduct>(class)?)
            }
            RecordClass::Processor => RawRecord::Processor(self.first::<Processor>(class)?),
            RecordClass::PhysicalMemory => {
                RawRecord::PhysicalMemory(self.first::<PhysicalMemory>(class)?)
            }
            RecordClass::Bios => RawRecord::Bios(self.first::<Bios>(class)?),
            RecordClass::ComputerSystem => {
                RawRecord::ComputerSystem(self.first::<ComputerSystem>(class)?)
            }
            RecordClass::DiskDrive => RawRecord::DiskDrive(self.first::<DiskDrive>(class)?),
            RecordClass::OperatingSystem => {
                RawRecord::OperatingSystem(self.first::<OperatingSystem>(class)?)
            }
        })
    }
}
