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

//! Output formatting

use serde::Serialize;

use hwp_core::{Collection, FingerprintMap};

/// JSON object of the fingerprint, keys sorted
pub fn render_fingerprint(map: &FingerprintMap, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(map)
    } else {
        serde_json::to_string(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedKey {
    pub key: &'static str,
    pub error: String,
}

pub fn failed_keys(collection: &Collection) -> Vec<FailedKey> {
    collection
        .failures()
        .into_iter()
        .map(|(key, error)| FailedKey { key, error })
        .collect()
}

/// One `key: error` line per failure
pub fn render_failures(failures: &[FailedKey]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}\n", f.key, f.error))
        .collect()
}
