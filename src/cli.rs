/*
 * This file is part of hwprint.
 *
 * Copyright (C) 2025 hwprint contributors
 *
 * hwprint is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * hwprint is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with hwprint. If not, see <https://www.gnu.org/licenses/>.
 */

//! Command Line Interface
//!
//! Argument parsing and the settings overrides derived from it.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use hwp_core::{AccessStrategy, SettingsOverrides};

#[derive(Parser, Debug)]
#[command(name = "hwprint")]
#[command(version)]
#[command(about = "hwprint - Hardware fingerprint for Windows hosts")]
#[command(long_about = "hwprint - Hardware fingerprint for Windows hosts

Waits for the WMI service, then prints a JSON object with nine keys:
digests of the machine UUID, processor, memory, BIOS, computer system and
disk, plus the hostname, primary IP address and MAC address. A key whose
value could not be collected is present with an empty string.

EXAMPLES:
    hwprint                               Fingerprint with automatic strategy
    hwprint --pretty --show-failures      Indented output, report failed keys
    hwprint --strategy command-output     Always hash wmic output
    hwprint --attempts 1                  Fail fast if WMI is not running

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging (overridden by --log-level)
    WINDIR                 Windows directory used to locate wmic.exe

FILES:
    %APPDATA%\\hwprint\\settings.json      Engine settings")]
pub struct Cli {
    /// Settings file (must exist when given)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Attribute access strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Readiness polls before giving up
    #[arg(long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Log filter, e.g. `debug` or `hwp_core=trace`
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Write each failed key and its error to stderr
    #[arg(long)]
    pub show_failures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Pick from the platform version
    Auto,
    /// Hash wmic output
    CommandOutput,
    /// Hash typed WMI records
    StructuredQuery,
}

impl StrategyArg {
    /// Forced strategy, `None` for automatic selection
    pub fn forced(self) -> Option<AccessStrategy> {
        match self {
            StrategyArg::Auto => None,
            StrategyArg::CommandOutput => Some(AccessStrategy::CommandOutput),
            StrategyArg::StructuredQuery => Some(AccessStrategy::StructuredQuery),
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            strategy: self.strategy.map(StrategyArg::forced),
            readiness_attempts: self.attempts,
        }
    }
}
