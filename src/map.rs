//! ExtentMap - the owned snapshot of a system's extent layout
//!
//! Holds the sorted segment store and the extent-size table, rebuilds both
//! from a [`RecordSource`] on `reload`, and answers queries against them.
//!
//! # Usage
//!
//! ```
//! use lvmap::{ExtentMap, SegmentRecord, StaticSource};
//!
//! let mut source = StaticSource::new(vec![
//!     SegmentRecord::allocated("vg0", "lv0", "/dev/sda2", 0, 10, 0),
//!     SegmentRecord::allocated("vg0", "lv0", "/dev/sdb1", 0, 5, 10),
//! ])
//! .with_extent_size("vg0", 4 * 1024 * 1024);
//!
//! let mut map = ExtentMap::new();
//! map.reload(&mut source).unwrap();
//!
//! let loc = map.find_owning_segment("vg0", "lv0", 12).unwrap();
//! assert_eq!((loc.device, loc.pe), ("/dev/sdb1", 2));
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LayoutPolicy;
use crate::error::{MapError, Result};
use crate::extent_size::ExtentSizeTable;
use crate::query::{FirstExtent, QueryEngine};
use crate::segment::{OwnerInfo, PhysicalLocation, SegmentRecord, SegmentStore, StoreState};
use crate::source::RecordSource;

/// Counts from one reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReloadReport {
    /// Segment records loaded.
    pub segments: usize,
    /// Extent-size entries loaded.
    pub extent_sizes: usize,
    /// Rows skipped because they could not be parsed.
    pub malformed: usize,
    /// Overlapping segment pairs found after sorting.
    pub overlaps: usize,
}

/// Owned, single-writer extent map.
///
/// Not internally synchronized. For concurrent readers use
/// [`crate::SharedExtentMap`], which publishes whole snapshots.
#[derive(Debug, Clone, Default)]
pub struct ExtentMap {
    segments: SegmentStore,
    extent_sizes: ExtentSizeTable,
    policy: LayoutPolicy,
}

impl ExtentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: LayoutPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Discard everything and rebuild from `source`.
    ///
    /// Malformed rows are logged and skipped. Source failures, allocation
    /// failures and (under [`LayoutPolicy::Strict`]) overlapping segments
    /// abort the reload and leave the map empty.
    pub fn reload(&mut self, source: &mut dyn RecordSource) -> Result<ReloadReport> {
        self.dispose();
        let result = self.rebuild(source);
        if result.is_err() {
            self.dispose();
        }
        result
    }

    /// Drop all segments and extent sizes.
    pub fn dispose(&mut self) {
        self.segments.reset();
        self.extent_sizes.reset();
    }

    fn rebuild(&mut self, source: &mut dyn RecordSource) -> Result<ReloadReport> {
        let mut report = ReloadReport::default();

        debug!("loading segments");
        for row in source.segment_rows()? {
            match row {
                Ok(record) => {
                    self.segments.append(record)?;
                    report.segments += 1;
                }
                Err(bad) => {
                    warn!(line = bad.line, reason = %bad.reason, text = %bad.text, "skipping malformed segment row");
                    report.malformed += 1;
                }
            }
        }
        self.segments.sort();

        let overlaps = self.segments.find_overlaps();
        for overlap in &overlaps {
            let records = self.segments.records();
            warn!(
                kind = ?overlap.kind,
                first = %describe(&records[overlap.first]),
                second = %describe(&records[overlap.second]),
                "overlapping segments"
            );
        }
        report.overlaps = overlaps.len();
        if report.overlaps > 0 && self.policy == LayoutPolicy::Strict {
            return Err(MapError::LayoutViolation(report.overlaps));
        }

        debug!("loading extent sizes");
        for row in source.extent_size_rows()? {
            match row {
                Ok(entry) => {
                    self.extent_sizes.insert(entry)?;
                    report.extent_sizes += 1;
                }
                Err(bad) => {
                    warn!(line = bad.line, reason = %bad.reason, text = %bad.text, "skipping malformed extent size row");
                    report.malformed += 1;
                }
            }
        }

        info!(
            segments = report.segments,
            extent_sizes = report.extent_sizes,
            malformed = report.malformed,
            overlaps = report.overlaps,
            "extent map reloaded"
        );
        Ok(report)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn state(&self) -> StoreState {
        self.segments.state()
    }

    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// All segments, sorted by `(vg_name, lv_name, lv_start)`.
    pub fn segments(&self) -> &[SegmentRecord] {
        self.segments.records()
    }

    pub fn extent_sizes(&self) -> &ExtentSizeTable {
        &self.extent_sizes
    }

    /// Query view over the current snapshot.
    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::for_store(&self.segments, &self.extent_sizes)
    }

    // -- Queries --------------------------------------------------------------

    pub fn find_owning_segment(&self, vg: &str, lv: &str, le: u64) -> Option<PhysicalLocation<'_>> {
        self.query().find_owning_segment(vg, lv, le)
    }

    pub fn find_owner_at(&self, vg: &str, pv: &str, pe: u64) -> Option<OwnerInfo<'_>> {
        self.query().find_owner_at(vg, pv, pe)
    }

    pub fn free_extent_count(&self, vg: &str, pv: Option<&str>) -> u64 {
        self.query().free_extent_count(vg, pv)
    }

    pub fn first_extent_of(&self, vg: &str, lv: &str, pv: &str) -> Option<FirstExtent<'_>> {
        self.query().first_extent_of(vg, lv, pv)
    }

    pub fn used_extent_count(&self, vg: &str, lv: &str, pv: &str) -> Result<u64> {
        self.query().used_extent_count(vg, lv, pv)
    }

    pub fn extent_size_bytes(&self, vg: &str) -> u64 {
        self.query().extent_size_bytes(vg)
    }
}

fn describe(r: &SegmentRecord) -> String {
    format!(
        "{}/{} on {} PE {}..{} LE {}..{}",
        r.vg_name,
        r.lv_name,
        r.pv_name,
        r.pv_start,
        r.pe_end(),
        r.lv_start,
        r.le_end()
    )
}

// ── Tests ──────────────────────────────────────────────────────────
