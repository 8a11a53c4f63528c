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

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use hwp_core::{system, EngineSettings};
use hwprint::cli::Cli;
use hwprint::logger::init_logging;
use hwprint::output::{failed_keys, render_failures, render_fingerprint};

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = EngineSettings::load(cli.settings.as_deref())
        .context("Failed to load settings")?
        .with_overrides(&cli.overrides())
        .context("Invalid settings")?;
    debug!(?settings, "Effective settings");

    let config = settings.engine_config()?;
    let collection = system::collect(config).context("Hardware fingerprint unavailable")?;

    if cli.show_failures {
        eprint!("{}", render_failures(&failed_keys(&collection)));
    }

    let fingerprint = collection.into_map();
    println!("{}", render_fingerprint(&fingerprint, cli.pretty)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
