//! Fingerprint map
//!
//! The output of a fingerprint run: exactly the nine well-known keys, each
//! holding an encoded digest, a raw host fact, or an empty string when that
//! part could not be collected. Maps are built fully shaped and only ever
//! overwrite existing keys, so no code path can add or drop a key.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::keys;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FingerprintMap {
    values: BTreeMap<String, String>,
}

impl Default for FingerprintMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintMap {
    /// Map with every key present and empty
    pub fn new() -> Self {
        let values = keys::ALL
            .iter()
            .map(|key| (key.to_string(), String::new()))
            .collect();
        Self { values }
    }

    /// Overwrite a well-known key; other keys are ignored
    pub(crate) fn set(&mut self, key: &str, value: String) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value;
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys whose value is empty
    pub fn missing(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect()
    }
}
