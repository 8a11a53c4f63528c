//! Instrumentation records
//!
//! Typed shapes of the WMI classes the structured-query backend reads. Field
//! order is part of the canonical encoding: reordering fields changes every
//! digest produced from the record.
//!
//! WMI reports `uint64` properties as strings and leaves unset properties
//! NULL, so every field goes through a lenient deserializer that accepts
//! numbers, numeric strings and NULL.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest;
use hwp_error::Result;

// ============================================================================
// Record Classes
// ============================================================================

/// Record shape requested from the structured query collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordClass {
    ComputerSystemProduct,
    Processor,
    PhysicalMemory,
    Bios,
    ComputerSystem,
    DiskDrive,
    OperatingSystem,
}

impl RecordClass {
    /// WMI class name
    pub fn class_name(&self) -> &'static str {
        match self {
            RecordClass::ComputerSystemProduct => "Win32_ComputerSystemProduct",
            RecordClass::Processor => "Win32_Processor",
            RecordClass::PhysicalMemory => "Win32_PhysicalMemory",
            RecordClass::Bios => "Win32_BIOS",
            RecordClass::ComputerSystem => "Win32_ComputerSystem",
            RecordClass::DiskDrive => "Win32_DiskDrive",
            RecordClass::OperatingSystem => "Win32_OperatingSystem",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

// ============================================================================
// Record Shapes
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_ComputerSystemProduct")]
pub struct ComputerSystemProduct {
    #[serde(rename = "UUID", deserialize_with = "lenient::string")]
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_Processor")]
pub struct Processor {
    #[serde(rename = "Caption", deserialize_with = "lenient::string")]
    pub caption: String,
    #[serde(rename = "DeviceID", deserialize_with = "lenient::string")]
    pub device_id: String,
    #[serde(rename = "Manufacturer", deserialize_with = "lenient::string")]
    pub manufacturer: String,
    #[serde(rename = "MaxClockSpeed", deserialize_with = "lenient::uint32")]
    pub max_clock_speed: u32,
    #[serde(rename = "Name", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "SocketDesignation", deserialize_with = "lenient::string")]
    pub socket_designation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_PhysicalMemory")]
pub struct PhysicalMemory {
    #[serde(rename = "Capacity", deserialize_with = "lenient::uint64")]
    pub capacity: u64,
    #[serde(rename = "DeviceLocator", deserialize_with = "lenient::string")]
    pub device_locator: String,
    #[serde(rename = "MemoryType", deserialize_with = "lenient::uint16")]
    pub memory_type: u16,
    #[serde(rename = "Name", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "Tag", deserialize_with = "lenient::string")]
    pub tag: String,
    #[serde(rename = "TotalWidth", deserialize_with = "lenient::uint16")]
    pub total_width: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_BIOS")]
pub struct Bios {
    #[serde(rename = "Manufacturer", deserialize_with = "lenient::string")]
    pub manufacturer: String,
    #[serde(rename = "Name", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "SerialNumber", deserialize_with = "lenient::string")]
    pub serial_number: String,
    #[serde(rename = "SMBIOSBIOSVersion", deserialize_with = "lenient::string")]
    pub smbios_bios_version: String,
    #[serde(rename = "Version", deserialize_with = "lenient::string")]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_ComputerSystem")]
pub struct ComputerSystem {
    #[serde(rename = "DNSHostName", deserialize_with = "lenient::string")]
    pub dns_host_name: String,
    #[serde(rename = "Domain", deserialize_with = "lenient::string")]
    pub domain: String,
    #[serde(rename = "Manufacturer", deserialize_with = "lenient::string")]
    pub manufacturer: String,
    #[serde(rename = "Model", deserialize_with = "lenient::string")]
    pub model: String,
    #[serde(rename = "Name", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "PrimaryOwnerName", deserialize_with = "lenient::string")]
    pub primary_owner_name: String,
    #[serde(rename = "TotalPhysicalMemory", deserialize_with = "lenient::uint64")]
    pub total_physical_memory: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_DiskDrive")]
pub struct DiskDrive {
    #[serde(rename = "Caption", deserialize_with = "lenient::string")]
    pub caption: String,
    #[serde(rename = "DeviceID", deserialize_with = "lenient::string")]
    pub device_id: String,
    #[serde(rename = "Model", deserialize_with = "lenient::string")]
    pub model: String,
    #[serde(rename = "Partitions", deserialize_with = "lenient::uint32")]
    pub partitions: u32,
    #[serde(rename = "Size", deserialize_with = "lenient::uint64")]
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Win32_OperatingSystem")]
pub struct OperatingSystem {
    #[serde(rename = "Caption", deserialize_with = "lenient::string")]
    pub caption: String,
    #[serde(rename = "OperatingSystemSKU", deserialize_with = "lenient::uint32")]
    pub operating_system_sku: u32,
    #[serde(rename = "Version", deserialize_with = "lenient::string")]
    pub version: String,
}

// ============================================================================
// Raw Record
// ============================================================================

/// First record returned by a structured query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    ComputerSystemProduct(ComputerSystemProduct),
    Processor(Processor),
    PhysicalMemory(PhysicalMemory),
    Bios(Bios),
    ComputerSystem(ComputerSystem),
    DiskDrive(DiskDrive),
    OperatingSystem(OperatingSystem),
}

impl RawRecord {
    pub fn class(&self) -> RecordClass {
        match self {
            RawRecord::ComputerSystemProduct(_) => RecordClass::ComputerSystemProduct,
            RawRecord::Processor(_) => RecordClass::Processor,
            RawRecord::PhysicalMemory(_) => RecordClass::PhysicalMemory,
            RawRecord::Bios(_) => RecordClass::Bios,
            RawRecord::ComputerSystem(_) => RecordClass::ComputerSystem,
            RawRecord::DiskDrive(_) => RecordClass::DiskDrive,
            RawRecord::OperatingSystem(_) => RecordClass::OperatingSystem,
        }
    }

    /// Canonical bytes of the inner record
    ///
    /// The enum tag is not part of the encoding; only the record fields are.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        match self {
            RawRecord::ComputerSystemProduct(r) => digest::canonical_bytes(r),
            RawRecord::Processor(r) => digest::canonical_bytes(r),
            RawRecord::PhysicalMemory(r) => digest::canonical_bytes(r),
            RawRecord::Bios(r) => digest::canonical_bytes(r),
            RawRecord::ComputerSystem(r) => digest::canonical_bytes(r),
            RawRecord::DiskDrive(r) => digest::canonical_bytes(r),
            RawRecord::OperatingSystem(r) => digest::canonical_bytes(r),
        }
    }
}

// ============================================================================
// Lenient Field Deserializers
// ============================================================================

mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Unsigned(u64),
        Signed(i64),
        Text(String),
        Flag(bool),
    }

    fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None => Ok(0),
            Some(Value::Unsigned(n)) => Ok(n),
            Some(Value::Signed(n)) => u64::try_from(n).map_err(D::Error::custom),
            Some(Value::Text(s)) if s.trim().is_empty() => Ok(0),
            Some(Value::Text(s)) => s.trim().parse().map_err(D::Error::custom),
            Some(Value::Flag(b)) => Ok(u64::from(b)),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None => String::new(),
            Some(Value::Text(s)) => s,
            Some(Value::Unsigned(n)) => n.to_string(),
            Some(Value::Signed(n)) => n.to_string(),
            Some(Value::Flag(b)) => b.to_string(),
        })
    }

    pub fn uint16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        u16::try_from(number(deserializer)?).map_err(D::Error::custom)
    }

    pub fn uint32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        u32::try_from(number(deserializer)?).map_err(D::Error::custom)
    }

    pub fn uint64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        number(deserializer)
    }
}
