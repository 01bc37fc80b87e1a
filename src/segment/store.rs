//! Owned collection of segment records and its lifecycle.
//!
//! Lifecycle: `Empty -> Populating -> Sorted -> Empty`. Records are appended
//! while populating, sorted once by `(vg_name, lv_name, lv_start)`, and
//! then only read until the next `reset`. There is no partial update.

use crate::error::{MapError, Result};
use crate::segment::record::SegmentRecord;

/// Capacity reserved by the first append.
const INITIAL_CAPACITY: usize = 64;

/// Lifecycle state of a [`SegmentStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No records.
    Empty,
    /// Records are being appended; order is arbitrary.
    Populating,
    /// Sorted by the composite key. Forward lookup is only correct here.
    Sorted,
}

/// Which non-overlap invariant a pair of records violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Same `(vg, lv)`, overlapping logical extent ranges.
    Logical,
    /// Same `(vg, pv)`, overlapping physical extent ranges.
    Physical,
}

/// Two records (by position in the store) that overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub kind: OverlapKind,
    pub first: usize,
    pub second: usize,
}

/// Growable, owned collection of [`SegmentRecord`]s.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    records: Vec<SegmentRecord>,
    state: StoreState,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: StoreState::Empty,
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Append one record.
    ///
    /// Capacity grows geometrically. Allocation failure is reported as
    /// `MapError::OutOfMemory` instead of aborting. Appending to a sorted
    /// store is rejected: `reset` must come first.
    pub fn append(&mut self, record: SegmentRecord) -> Result<()> {
        if self.state == StoreState::Sorted {
            return Err(MapError::InvalidState {
                op: "append",
                state: self.state,
            });
        }

        if self.records.len() == self.records.capacity() {
            let additional = self.records.capacity().max(INITIAL_CAPACITY);
            self.records
                .try_reserve(additional)
                .map_err(|_| MapError::OutOfMemory {
                    what: "segment store",
                    requested: additional,
                })?;
        }

        self.records.push(record);
        self.state = StoreState::Populating;
        Ok(())
    }

    /// Sort by `(vg_name, lv_name, lv_start)`.
    ///
    /// Stable, so records with equal keys keep their append order.
    pub fn sort(&mut self) {
        self.records.sort_by(SegmentRecord::cmp_key);
        self.state = StoreState::Sorted;
    }

    /// Drop all records and release their storage. Idempotent.
    pub fn reset(&mut self) {
        self.records.clear();
        self.records.shrink_to_fit();
        self.state = StoreState::Empty;
    }

    // -- Read access ----------------------------------------------------------

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SegmentRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentRecord> {
        self.records.iter()
    }

    /// True if every adjacent pair is ordered by the composite key.
    pub fn is_sorted(&self) -> bool {
        self.records
            .windows(2)
            .all(|w| w[0].cmp_key(&w[1]).is_le())
    }

    // -- Layout validation ----------------------------------------------------

    /// Find records that break either non-overlap invariant.
    ///
    /// Each offending record is reported once, paired with the earlier
    /// record reaching furthest into its range. Zero-length records never
    /// overlap anything. Logical checks skip unallocated records.
    pub fn find_overlaps(&self) -> Vec<Overlap> {
        let records = &self.records;
        let mut overlaps = Vec::new();

        let mut logical: Vec<usize> = (0..records.len())
            .filter(|&i| {
                let r = &records[i];
                r.pv_length > 0 && !r.lv_name.is_empty()
            })
            .collect();
        logical.sort_by(|&a, &b| records[a].cmp_key(&records[b]));
        sweep(
            &logical,
            move |i| {
                let r = &records[i];
                ((r.vg_name.as_str(), r.lv_name.as_str()), r.lv_start, r.le_end())
            },
            OverlapKind::Logical,
            &mut overlaps,
        );

        let mut physical: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].pv_length > 0)
            .collect();
        physical.sort_by(|&a, &b| {
            let (ra, rb) = (&records[a], &records[b]);
            ra.vg_name
                .cmp(&rb.vg_name)
                .then_with(|| ra.pv_name.cmp(&rb.pv_name))
                .then_with(|| ra.pv_start.cmp(&rb.pv_start))
        });
        sweep(
            &physical,
            move |i| {
                let r = &records[i];
                ((r.vg_name.as_str(), r.pv_name.as_str()), r.pv_start, r.pe_end())
            },
            OverlapKind::Physical,
            &mut overlaps,
        );

        overlaps
    }
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sweep indices ordered by `(group, start)`, reporting any range that
/// starts before the furthest end seen so far in its group.
fn sweep<'a, F>(order: &[usize], range_of: F, kind: OverlapKind, out: &mut Vec<Overlap>)
where
    F: Fn(usize) -> ((&'a str, &'a str), u64, u64),
{
    let mut current: Option<((&str, &str), u64, usize)> = None;

    for &idx in order {
        let (group, start, end) = range_of(idx);
        match current {
            Some((g, max_end, max_idx)) if g == group => {
                if start < max_end {
                    out.push(Overlap {
                        kind,
                        first: max_idx,
                        second: idx,
                    });
                }
                if end > max_end {
                    current = Some((group, end, idx));
                }
            }
            _ => current = Some((group, end, idx)),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
