//! Dotted version ordering
//!
//! Platform versions such as `10.0.26100` are compared component by component
//! as integers. Missing trailing components count as zero, so `10.0` equals
//! `10.0.0`. A component may carry a non-numeric suffix (`14393nano` on Nano
//! Server); only its leading digits take part in the comparison.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use hwp_error::{HwprintError, Result};

#[derive(Debug, Clone)]
pub struct DottedVersion {
    components: Vec<u64>,
    raw: String,
}

impl DottedVersion {
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Err(HwprintError::invalid_version(version, "empty version string"));
        }

        let components = trimmed
            .split('.')
            .map(|part| parse_component(version, part))
            .collect::<Result<Vec<u64>>>()?;

        Ok(Self {
            components,
            raw: trimmed.to_string(),
        })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

fn parse_component(version: &str, part: &str) -> Result<u64> {
    let digits: &str = {
        let end = part
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(part.len());
        &part[..end]
    };

    if digits.is_empty() {
        return Err(HwprintError::invalid_version(
            version,
            format!("component {:?} is not numeric", part),
        ));
    }

    digits.parse::<u64>().map_err(|e| {
        HwprintError::invalid_version(version, format!("component {:?}: {}", part, e))
    })
}

impl FromStr for DottedVersion {
    type Err = HwprintError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}
