//! Record sources: where a reload gets its segments and extent sizes.
//!
//! Provides:
//! - `parse` -- row parsers for `pvs` / `vgs` text output
//! - `units` -- size strings with unit suffixes
//! - `text` -- `TextSource`, captured output held in memory
//! - `command` -- `CommandSource`, runs the LVM tools
//!
//! A source is pull-based and restartable: every call returns the full
//! sequence from the beginning. Rows that fail to parse are returned as
//! `Err(MalformedRecord)` so the consumer can log and skip them.

pub mod command;
pub mod parse;
pub mod text;
pub mod units;

use crate::error::{MalformedRecord, Result};
use crate::extent_size::ExtentSize;
use crate::segment::SegmentRecord;

pub use command::CommandSource;
pub use text::TextSource;
pub use units::parse_size;

/// One parsed row, or the reason it could not be parsed.
pub type Row<T> = std::result::Result<T, MalformedRecord>;

/// Supplier of segment and extent-size rows for [`crate::ExtentMap::reload`].
///
/// An outer `Err` means the source itself failed (tool did not run, file
/// unreadable) and aborts the reload; an inner `Err` is a single bad row.
pub trait RecordSource {
    fn segment_rows(&mut self) -> Result<Vec<Row<SegmentRecord>>>;

    fn extent_size_rows(&mut self) -> Result<Vec<Row<ExtentSize>>>;
}

/// Source over records that are already built.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub segments: Vec<SegmentRecord>,
    pub extent_sizes: Vec<ExtentSize>,
}

impl StaticSource {
    pub fn new(segments: Vec<SegmentRecord>) -> Self {
        Self {
            segments,
            extent_sizes: Vec::new(),
        }
    }

    pub fn with_extent_size(mut self, vg_name: &str, pe_size_bytes: u64) -> Self {
        self.extent_sizes.push(ExtentSize {
            vg_name: vg_name.to_string(),
            pe_size_bytes,
        });
        self
    }
}

impl RecordSource for StaticSource {
    fn segment_rows(&mut self) -> Result<Vec<Row<SegmentRecord>>> {
        Ok(self.segments.iter().cloned().map(Ok).collect())
    }

    fn extent_size_rows(&mut self) -> Result<Vec<Row<ExtentSize>>> {
        Ok(self.extent_sizes.iter().cloned().map(Ok).collect())
    }
}
