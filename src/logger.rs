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

//! Logging setup
//!
//! Logs go to stderr so stdout carries only the fingerprint.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Filter directive: the flag, else RUST_LOG, else the default
pub fn filter_directive(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

pub fn init_logging(flag: Option<&str>) {
    let directive = filter_directive(flag);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?}: {}, using {}", directive, e, DEFAULT_LOG_LEVEL);
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
