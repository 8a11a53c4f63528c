//! Hardware categories
//!
//! Each category pairs its fingerprint key with the wmic arguments used by the
//! command-output backend and the record class used by the structured-query
//! backend. Both halves are always present, whichever backend is active.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::keys;
use crate::records::RecordClass;
use crate::selector::AccessStrategy;
use hwp_error::HwprintError;

/// One independently hashed hardware facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Uuid,
    Processor,
    Memory,
    Bios,
    System,
    Disk,
}

/// Static pairing of a category with both backends' query identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub category: Category,
    pub key: &'static str,
    pub command_args: &'static [&'static str],
    pub record_class: RecordClass,
}

/// Descriptors in collection order
pub const DESCRIPTORS: [CategoryDescriptor; 6] = [
    CategoryDescriptor {
        category: Category::Uuid,
        key: keys::UUID,
        command_args: &["csproduct", "get", "UUID"],
        record_class: RecordClass::ComputerSystemProduct,
    },
    CategoryDescriptor {
        category: Category::Processor,
        key: keys::PROCESSOR,
        command_args: &["cpu", "list", "brief"],
        record_class: RecordClass::Processor,
    },
    CategoryDescriptor {
        category: Category::Memory,
        key: keys::MEMORY,
        command_args: &["memorychip", "list", "brief"],
        record_class: RecordClass::PhysicalMemory,
    },
    CategoryDescriptor {
        category: Category::Bios,
        key: keys::BIOS,
        command_args: &["bios", "list", "brief"],
        record_class: RecordClass::Bios,
    },
    CategoryDescriptor {
        category: Category::System,
        key: keys::SYSTEM,
        command_args: &["computersystem", "list", "brief"],
        record_class: RecordClass::ComputerSystem,
    },
    CategoryDescriptor {
        category: Category::Disk,
        key: keys::DISK,
        command_args: &["diskdrive", "list", "brief"],
        record_class: RecordClass::DiskDrive,
    },
];

impl Category {
    /// All categories in collection order
    pub const ALL: [Category; 6] = [
        Category::Uuid,
        Category::Processor,
        Category::Memory,
        Category::Bios,
        Category::System,
        Category::Disk,
    ];

    pub fn descriptor(&self) -> &'static CategoryDescriptor {
        let index = match self {
            Category::Uuid => 0,
            Category::Processor => 1,
            Category::Memory => 2,
            Category::Bios => 3,
            Category::System => 4,
            Category::Disk => 5,
        };
        &DESCRIPTORS[index]
    }

    /// Fingerprint map key
    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn command_args(&self) -> &'static [&'static str] {
        self.descriptor().command_args
    }

    pub fn record_class(&self) -> RecordClass {
        self.descriptor().record_class
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Uuid => "uuid",
            Category::Processor => "processor",
            Category::Memory => "memory",
            Category::Bios => "bios",
            Category::System => "system",
            Category::Disk => "disk",
        };
        f.write_str(name)
    }
}

/// A category query that failed under a given backend
#[derive(thiserror::Error, Debug)]
#[error("{category} ({key}) via {strategy} failed: {source}")]
pub struct CategoryError {
    pub category: Category,
    pub key: &'static str,
    pub strategy: AccessStrategy,
    #[source]
    pub source: HwprintError,
}

impl CategoryError {
    pub fn new(category: Category, strategy: AccessStrategy, source: HwprintError) -> Self {
        Self {
            category,
            key: category.key(),
            strategy,
            source,
        }
    }
}
