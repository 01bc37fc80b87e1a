//! Queries over a loaded snapshot: lookups, free space and usage.
//!
//! `QueryEngine` borrows the segment slice and the extent-size table of an
//! [`crate::ExtentMap`]. Every call is read-only. "Not found"
//! is `None` (or 0 for counts), never an error.

use crate::error::{MapError, Result};
use crate::extent_size::ExtentSizeTable;
use crate::segment::{OwnerInfo, PhysicalLocation, SegmentIndex, SegmentRecord, SegmentStore};

/// Lowest logical extent an LV has on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstExtent<'a> {
    pub le: u64,
    pub pe: u64,
    pub device: &'a str,
}

/// Where the physical extent that would keep an LV contiguous on its
/// device actually stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// The extent is already at its contiguous position.
    Optimal,
    /// The contiguous position is unallocated.
    Free,
    /// The contiguous position holds another extent.
    Allocated { owner: &'a str, le: u64 },
    /// The contiguous position lies past the end of the device.
    PastEnd,
}

/// Result of [`QueryEngine::placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementReport<'a> {
    pub location: PhysicalLocation<'a>,
    pub first: FirstExtent<'a>,
    pub optimal_pe: u64,
    pub verdict: Placement<'a>,
}

/// Read-only query view.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: SegmentIndex<'a>,
    sizes: &'a ExtentSizeTable,
}

impl<'a> QueryEngine<'a> {
    /// Query an arbitrary slice. Forward lookup needs it sorted by
    /// [`SegmentRecord::cmp_key`]; scans and accounting do not.
    pub fn new(records: &'a [SegmentRecord], sizes: &'a ExtentSizeTable) -> Self {
        Self {
            index: SegmentIndex::new(records),
            sizes,
        }
    }

    /// Query the records of `store`, valid in any lifecycle state.
    pub fn for_store(store: &'a SegmentStore, sizes: &'a ExtentSizeTable) -> Self {
        Self {
            index: SegmentIndex::of_store(store),
            sizes,
        }
    }

    // -- Lookups --------------------------------------------------------------

    /// Physical location of logical extent `le` of `vg/lv`.
    pub fn find_owning_segment(&self, vg: &str, lv: &str, le: u64) -> Option<PhysicalLocation<'a>> {
        self.index.find_owning_segment(vg, lv, le)
    }

    /// Owner of physical extent `pe` on device `pv`. O(N).
    pub fn find_owner_at(&self, vg: &str, pv: &str, pe: u64) -> Option<OwnerInfo<'a>> {
        self.index.find_owner_at(vg, pv, pe)
    }

    pub fn segments_of(&self, vg: &str, lv: &str) -> &'a [SegmentRecord] {
        self.index.segments_of(vg, lv)
    }

    // -- Accounting -----------------------------------------------------------

    /// Free extents in `vg`, on one device if `pv` is given.
    ///
    /// Unknown groups and devices count as zero.
    pub fn free_extent_count(&self, vg: &str, pv: Option<&str>) -> u64 {
        self.index
            .records()
            .iter()
            .filter(|r| r.vg_name == vg && r.is_free())
            .filter(|r| pv.map_or(true, |pv| r.pv_name == pv))
            .fold(0u64, |sum, r| sum.saturating_add(r.pv_length))
    }

    /// Lowest logical extent of `vg/lv` stored on `pv`.
    ///
    /// Ties on `lv_start` keep the first record in store order.
    pub fn first_extent_of(&self, vg: &str, lv: &str, pv: &str) -> Option<FirstExtent<'a>> {
        self.index
            .records()
            .iter()
            .filter(|r| r.vg_name == vg && r.lv_name == lv && r.pv_name == pv)
            .fold(None::<&SegmentRecord>, |best, r| match best {
                Some(b) if b.lv_start <= r.lv_start => Some(b),
                _ => Some(r),
            })
            .map(|r| FirstExtent {
                le: r.lv_start,
                pe: r.pv_start,
                device: &r.pv_name,
            })
    }

    /// Extents of `vg/lv` stored on `pv`. All three names are required.
    pub fn used_extent_count(&self, vg: &str, lv: &str, pv: &str) -> Result<u64> {
        if vg.is_empty() {
            return Err(MapError::InvalidArgument("volume group name must not be empty"));
        }
        if lv.is_empty() {
            return Err(MapError::InvalidArgument("logical volume name must not be empty"));
        }
        if pv.is_empty() {
            return Err(MapError::InvalidArgument("physical volume name must not be empty"));
        }

        Ok(self
            .index
            .records()
            .iter()
            .filter(|r| r.vg_name == vg && r.lv_name == lv && r.pv_name == pv)
            .fold(0u64, |sum, r| sum.saturating_add(r.pv_length)))
    }

    /// Extent size of `vg` in bytes, 0 if unknown.
    pub fn extent_size_bytes(&self, vg: &str) -> u64 {
        self.sizes.get(vg)
    }

    pub fn free_bytes(&self, vg: &str, pv: Option<&str>) -> u64 {
        self.free_extent_count(vg, pv)
            .saturating_mul(self.extent_size_bytes(vg))
    }

    pub fn used_bytes(&self, vg: &str, lv: &str, pv: &str) -> Result<u64> {
        Ok(self
            .used_extent_count(vg, lv, pv)?
            .saturating_mul(self.extent_size_bytes(vg)))
    }

    // -- Placement ------------------------------------------------------------

    /// Check whether logical extent `le` of `vg/lv` sits where it would if
    /// the LV were laid out contiguously from its first extent on the same
    /// device, and if not, what occupies that spot.
    ///
    /// `None` when `le` does not resolve.
    pub fn placement(&self, vg: &str, lv: &str, le: u64) -> Option<PlacementReport<'a>> {
        let location = self.find_owning_segment(vg, lv, le)?;
        let first = self.first_extent_of(vg, lv, location.device)?;
        let optimal_pe = first.pe.saturating_add(le - first.le);

        let verdict = if optimal_pe == location.pe {
            Placement::Optimal
        } else {
            match self.find_owner_at(vg, location.device, optimal_pe) {
                None => Placement::PastEnd,
                Some(owner) if owner.is_free() => Placement::Free,
                Some(owner) => Placement::Allocated {
                    owner: owner.owner,
                    le: owner.le,
                },
            }
        };

        Some(PlacementReport {
            location,
            first,
            optimal_pe,
            verdict,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────
