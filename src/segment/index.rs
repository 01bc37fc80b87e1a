//! Search over a sorted segment slice.
//!
//! Forward lookup (LE -> PE) is an O(log N) binary search whose comparator
//! tests interval containment rather than equality. It is only correct if
//! the slice is sorted by `(vg_name, lv_name, lv_start)` and no two
//! segments of one logical volume overlap in logical extent space.
//!
//! Reverse lookup (PE -> owner) is an O(N) scan: the sort order groups
//! records by logical volume, not by physical position.

use std::cmp::Ordering;

use crate::segment::record::SegmentRecord;
use crate::segment::store::{SegmentStore, StoreState};

/// Where a logical extent lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLocation<'a> {
    pub device: &'a str,
    pub pe: u64,
    /// The segment that maps the extent.
    pub segment: &'a SegmentRecord,
}

/// Who occupies a physical extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerInfo<'a> {
    pub device: &'a str,
    /// `"free"` for unallocated space, otherwise the logical volume name.
    pub owner: &'a str,
    pub le: u64,
    pub pe: u64,
}

impl OwnerInfo<'_> {
    pub fn is_free(&self) -> bool {
        self.owner == SegmentRecord::FREE_TYPE
    }
}

/// Read-only search view over a slice of segments.
///
/// Reverse lookup and scans work in any order. Forward lookup and
/// [`SegmentIndex::segments_of`] need the slice sorted by
/// [`SegmentRecord::cmp_key`] and find nothing otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SegmentIndex<'a> {
    records: &'a [SegmentRecord],
    sorted: bool,
}

impl<'a> SegmentIndex<'a> {
    /// Wrap an arbitrary slice. Sortedness is checked once, here.
    pub fn new(records: &'a [SegmentRecord]) -> Self {
        let sorted = records.windows(2).all(|w| w[0].cmp_key(&w[1]).is_le());
        Self { records, sorted }
    }

    /// Wrap the records of `store`, trusting its lifecycle state.
    pub fn of_store(store: &'a SegmentStore) -> Self {
        Self {
            records: store.records(),
            sorted: store.state() == StoreState::Sorted,
        }
    }

    pub fn records(&self) -> &'a [SegmentRecord] {
        self.records
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Find the segment mapping logical extent `le` of `vg/lv`.
    ///
    /// Returns `None` for an unknown volume, an extent past the end of the
    /// volume, an empty `lv` (unallocated space has no logical extents), an
    /// unsorted index, or a physical position that does not fit in a `u64`.
    pub fn find_owning_segment(&self, vg: &str, lv: &str, le: u64) -> Option<PhysicalLocation<'a>> {
        if lv.is_empty() || !self.sorted {
            return None;
        }

        let idx = self
            .records
            .binary_search_by(|rec| order_against(rec, vg, lv, le))
            .ok()?;
        let segment = &self.records[idx];

        Some(PhysicalLocation {
            device: &segment.pv_name,
            pe: segment.pv_start.checked_add(le - segment.lv_start)?,
            segment,
        })
    }

    /// Find what occupies physical extent `pe` of device `pv` in `vg`.
    ///
    /// First containing record in store order wins. Devices never carry
    /// overlapping segments, so at most one record can match. `None` if the
    /// logical position does not fit in a `u64`.
    pub fn find_owner_at(&self, vg: &str, pv: &str, pe: u64) -> Option<OwnerInfo<'a>> {
        let segment = self
            .records
            .iter()
            .find(|r| r.vg_name == vg && r.pv_name == pv && r.contains_pe(pe))?;

        let offset = pe - segment.pv_start;
        let owner = if segment.is_free() {
            SegmentRecord::FREE_TYPE
        } else {
            segment.lv_name.as_str()
        };

        Some(OwnerInfo {
            device: &segment.pv_name,
            owner,
            le: segment.lv_start.checked_add(offset)?,
            pe,
        })
    }

    /// All segments of `vg/lv`, in logical order. Empty if unsorted.
    pub fn segments_of(&self, vg: &str, lv: &str) -> &'a [SegmentRecord] {
        if !self.sorted {
            return &[];
        }
        let key = |r: &SegmentRecord| (r.vg_name.as_str(), r.lv_name.as_str()).cmp(&(vg, lv));
        let start = self.records.partition_point(|r| key(r) == Ordering::Less);
        let end = start + self.records[start..].partition_point(|r| key(r) == Ordering::Equal);
        &self.records[start..end]
    }
}

/// Order `rec` relative to the search key `(vg, lv, le)`.
///
/// `Equal` means the record's logical range contains `le`.
fn order_against(rec: &SegmentRecord, vg: &str, lv: &str, le: u64) -> Ordering {
    rec.vg_name
        .as_str()
        .cmp(vg)
        .then_with(|| rec.lv_name.as_str().cmp(lv))
        .then_with(|| {
            if rec.contains_le(le) {
                Ordering::Equal
            } else if rec.lv_start > le {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        })
}

// ── Tests ──────────────────────────────────────────────────────────
