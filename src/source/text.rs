//! Source over captured `pvs` / `vgs` output.

use std::path::Path;

use crate::error::Result;
use crate::extent_size::ExtentSize;
use crate::segment::SegmentRecord;
use crate::source::parse::{parse_extent_size_lines, parse_segment_lines};
use crate::source::{RecordSource, Row};

/// Captured tool output, parsed on every pull.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    pvs_output: String,
    vgs_output: String,
}

impl TextSource {
    pub fn new(pvs_output: impl Into<String>, vgs_output: impl Into<String>) -> Self {
        Self {
            pvs_output: pvs_output.into(),
            vgs_output: vgs_output.into(),
        }
    }

    /// Read both captures from files.
    pub fn from_files(pvs_path: &Path, vgs_path: &Path) -> Result<Self> {
        let pvs_output = std::fs::read_to_string(pvs_path)?;
        let vgs_output = std::fs::read_to_string(vgs_path)?;
        Ok(Self::new(pvs_output, vgs_output))
    }
}

impl RecordSource for TextSource {
    fn segment_rows(&mut self) -> Result<Vec<Row<SegmentRecord>>> {
        Ok(parse_segment_lines(&self.pvs_output))
    }

    fn extent_size_rows(&mut self) -> Result<Vec<Row<ExtentSize>>> {
        Ok(parse_extent_size_lines(&self.vgs_output))
    }
}
