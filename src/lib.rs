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

//! hwprint - Hardware fingerprint CLI
//!
//! Front end over `hwp-core`: argument parsing, logging setup and output
//! formatting.

pub mod cli;
pub mod logger;
pub mod output;
