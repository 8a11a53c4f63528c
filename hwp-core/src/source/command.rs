//! Command-output backend
//!
//! Runs `wmic.exe <args>` for each category and digests stdout exactly as
//! captured, line endings and column padding included.

use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

use super::{AttributeSource, CommandRunner};
use crate::category::Category;
use crate::digest::digest_bytes;
use crate::selector::AccessStrategy;
use hwp_error::Result;

pub struct CommandOutputSource<'a> {
    runner: &'a dyn CommandRunner,
    program: PathBuf,
}

impl<'a> CommandOutputSource<'a> {
    pub fn new(runner: &'a dyn CommandRunner, program: &Path) -> Self {
        Self {
            runner,
            program: program.to_path_buf(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Digest of the command output plus the output itself
    fn command_output_hash(&self, category: Category) -> Result<(String, Vec<u8>)> {
        let args = category.command_args();
        debug!(program = %self.program.display(), args = ?args, "Running command");

        let output = self.runner.run(&self.program, args).map_err(|e| {
            error!(category = %category, error = %e, "Command failed");
            e
        })?;

        Ok((digest_bytes(&output), output))
    }

    fn hash(&self, category: Category) -> Result<String> {
        self.command_output_hash(category).map(|(encoded, _)| encoded)
    }
}

impl AttributeSource for CommandOutputSource<'_> {
    fn strategy(&self) -> AccessStrategy {
        AccessStrategy::CommandOutput
    }

    fn uuid(&self) -> Result<String> {
        let (encoded, output) = self.command_output_hash(Category::Uuid)?;
        trace!(uuid = %String::from_utf8_lossy(&output).trim(), "Current UUID value");
        Ok(encoded)
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
