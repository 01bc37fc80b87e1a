//! Segment record: one contiguous run of extents with a single owner.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One row of `pvs --segments`: a run of physical extents on a device,
/// either mapped to a logical volume or unallocated.
///
/// Records are immutable once built. `pv_length` is expected to be > 0;
/// a zero-length record contains no extent and never matches a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Device hosting this segment (e.g. `/dev/sda2`).
    pub pv_name: String,
    pub vg_name: String,
    /// On-disk format tag, passed through untouched.
    pub vg_format: String,
    /// Attribute flags, passed through untouched.
    pub vg_attr: String,
    /// Owning logical volume; empty for unallocated space.
    pub lv_name: String,
    /// Segment type; [`SegmentRecord::FREE_TYPE`] marks unallocated space.
    pub pv_type: String,
    pub pv_start: u64,
    pub pv_length: u64,
    /// First logical extent mapped by this segment. Unused when `lv_name`
    /// is empty.
    pub lv_start: u64,
}

impl SegmentRecord {
    /// Segment type of unallocated space.
    pub const FREE_TYPE: &'static str = "free";

    /// Allocated segment of `lv_name` (segment type `linear`).
    pub fn allocated(
        vg_name: &str,
        lv_name: &str,
        pv_name: &str,
        pv_start: u64,
        pv_length: u64,
        lv_start: u64,
    ) -> Self {
        Self {
            pv_name: pv_name.to_string(),
            vg_name: vg_name.to_string(),
            vg_format: "lvm2".to_string(),
            vg_attr: "wz--n-".to_string(),
            lv_name: lv_name.to_string(),
            pv_type: "linear".to_string(),
            pv_start,
            pv_length,
            lv_start,
        }
    }

    /// Unallocated segment on `pv_name`.
    pub fn free(vg_name: &str, pv_name: &str, pv_start: u64, pv_length: u64) -> Self {
        Self {
            pv_name: pv_name.to_string(),
            vg_name: vg_name.to_string(),
            vg_format: "lvm2".to_string(),
            vg_attr: "wz--n-".to_string(),
            lv_name: String::new(),
            pv_type: Self::FREE_TYPE.to_string(),
            pv_start,
            pv_length,
            lv_start: 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.pv_type == Self::FREE_TYPE
    }

    /// Exclusive end of the physical extent range.
    pub fn pe_end(&self) -> u64 {
        self.pv_start.saturating_add(self.pv_length)
    }

    /// Exclusive end of the logical extent range.
    pub fn le_end(&self) -> u64 {
        self.lv_start.saturating_add(self.pv_length)
    }

    pub fn contains_le(&self, le: u64) -> bool {
        self.lv_start <= le && le < self.le_end()
    }

    pub fn contains_pe(&self, pe: u64) -> bool {
        self.pv_start <= pe && pe < self.pe_end()
    }

    /// Sort order of the store: `(vg_name, lv_name, lv_start)`.
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.vg_name
            .cmp(&other.vg_name)
            .then_with(|| self.lv_name.cmp(&other.lv_name))
            .then_with(|| self.lv_start.cmp(&other.lv_start))
    }
}
