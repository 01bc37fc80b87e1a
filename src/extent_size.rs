//! Per volume group physical extent size.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// One `vgs` row: a volume group and its extent size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentSize {
    pub vg_name: String,
    pub pe_size_bytes: u64,
}

/// Small unordered table keyed by exact volume group name.
///
/// A handful of entries at most, so lookup is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct ExtentSizeTable {
    entries: Vec<ExtentSize>,
}

impl ExtentSizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Duplicates are kept; lookups return the first one.
    pub fn insert(&mut self, entry: ExtentSize) -> Result<()> {
        self.entries
            .try_reserve(1)
            .map_err(|_| MapError::OutOfMemory {
                what: "extent size table",
                requested: 1,
            })?;
        self.entries.push(entry);
        Ok(())
    }

    /// Extent size of `vg_name` in bytes, 0 if unknown.
    pub fn get(&self, vg_name: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.vg_name == vg_name)
            .map(|e| e.pe_size_bytes)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtentSize> {
        self.entries.iter()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
    }
}
