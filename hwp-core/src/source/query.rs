//! Structured-query backend
//!
//! Asks WMI for the first record of each category's class and digests its
//! canonical encoding.

use tracing::{error, trace};

use super::{AttributeSource, RecordQuery};
use crate::category::Category;
use crate::digest::digest_bytes;
use crate::records::RawRecord;
use crate::selector::AccessStrategy;
use hwp_error::{HwprintError, Result};

pub struct StructuredQuerySource<'a> {
    query: &'a dyn RecordQuery,
}

impl<'a> StructuredQuerySource<'a> {
    pub fn new(query: &'a dyn RecordQuery) -> Self {
        Self { query }
    }

    /// First record for `category`, checked against the requested class
    fn fetch(&self, category: Category) -> Result<RawRecord> {
        let class = category.record_class();
        let record = self.query.query_first(class).map_err(|e| {
            error!(class = %class, error = %e, "Failed to fetch WMI object");
            e
        })?;

        if record.class() != class {
            return Err(HwprintError::UnexpectedRecord {
                expected: class.to_string(),
                actual: record.class().to_string(),
            });
        }
        Ok(record)
    }

    fn encode(record: &RawRecord) -> Result<String> {
        let bytes = record.canonical_bytes().map_err(|e| {
            error!(class = %record.class(), error = %e, "Failed to encode WMI object");
            e
        })?;
        Ok(digest_bytes(&bytes))
    }

    fn hash(&self, category: Category) -> Result<String> {
        Self::encode(&self.fetch(category)?)
    }
}

impl AttributeSource for StructuredQuerySource<'_> {
    fn strategy(&self) -> AccessStrategy {
        AccessStrategy::StructuredQuery
    }

    fn uuid(&self) -> Result<String> {
        let record = self.fetch(Category::Uuid)?;
        if let RawRecord::ComputerSystemProduct(product) = &record {
            trace!(uuid = %product.uuid, "Current UUID value");
        }
        Self::encode(&record)
    }

    fn processor(&self) -> Result<String> {
        self.hash(Category::Processor)
    }

    fn memory(&self) -> Result<String> {
        self.hash(Category::Memory)
    }

    fn bios(&self) -> Result<String> {
        self.hash(Category::Bios)
    }

    fn system(&self) -> Result<String> {
        self.hash(Category::System)
    }

    fn disk(&self) -> Result<String> {
        self.hash(Category::Disk)
    }
}
