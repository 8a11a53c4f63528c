//! Attribute sources
//!
//! The two backends that turn a hardware category into an encoded digest:
//!
//! - [`CommandOutputSource`] runs wmic with the category's arguments and
//!   digests the captured stdout.
//! - [`StructuredQuerySource`] asks WMI for the category's record class and
//!   digests the record's canonical encoding.
//!
//! Both hash with [`crate::digest::digest_bytes`], so a category's value only
//! depends on the bytes describing the hardware, never on which backend
//! produced them.

pub mod command;
pub mod query;

pub use command::CommandOutputSource;
pub use query::StructuredQuerySource;

use std::path::Path;
use std::process::Command;
use std::result::Result as StdResult;

use crate::category::{Category, CategoryError};
use crate::records::{RawRecord, RecordClass};
use crate::selector::AccessStrategy;
use hwp_error::{HwprintError, Result};

// ============================================================================
// Collaborators
// ============================================================================

/// Command execution collaborator
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` with `args`, returning its stdout
    fn run(&self, program: &Path, args: &[&'static str]) -> Result<Vec<u8>>;
}

/// Structured query collaborator
#[cfg_attr(test, mockall::automock)]
pub trait RecordQuery {
    /// First record of `class`
    fn query_first(&self, class: RecordClass) -> Result<RawRecord>;
}

/// Runs programs with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[&'static str]) -> Result<Vec<u8>> {
        let display = program.display().to_string();
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| HwprintError::command(&display, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HwprintError::command(
                display,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }

        Ok(output.stdout)
    }
}

// ============================================================================
// Attribute Source
// ============================================================================

/// A backend producing one encoded digest per hardware category
pub trait AttributeSource {
    fn strategy(&self) -> AccessStrategy;

    fn uuid(&self) -> Result<String>;
    fn processor(&self) -> Result<String>;
    fn memory(&self) -> Result<String>;
    fn bios(&self) -> Result<String>;
    fn system(&self) -> Result<String>;
    fn disk(&self) -> Result<String>;

    /// Digest for `category`, with failures tagged by category and backend
    fn collect(&self, category: Category) -> StdResult<String, CategoryError> {
        let outcome = match category {
            Category::Uuid => self.uuid(),
            Category::Processor => self.processor(),
            Category::Memory => self.memory(),
            Category::Bios => self.bios(),
            Category::System => self.system(),
            Category::Disk => self.disk(),
        };
        outcome.map_err(|e| CategoryError::new(category, self.strategy(), e))
    }
}

/// Build the backend for `strategy`
pub fn build_source<'a>(
    strategy: AccessStrategy,
    runner: &'a dyn CommandRunner,
    query: &'a dyn RecordQuery,
    wmic: &Path,
) -> Box<dyn AttributeSource + 'a> {
    match strategy {
        AccessStrategy::CommandOutput => Box::new(CommandOutputSource::new(runner, wmic)),
        AccessStrategy::StructuredQuery => Box::new(StructuredQuerySource::new(query)),
    }
}
