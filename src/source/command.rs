//! Source that runs `pvs` and `vgs` and parses their output.

use std::process::Command;

use tracing::debug;

use crate::config::Config;
use crate::error::{MapError, Result};
use crate::extent_size::ExtentSize;
use crate::segment::SegmentRecord;
use crate::source::parse::{parse_extent_size_lines, parse_segment_lines};
use crate::source::{RecordSource, Row};

/// Segment listing: one row per segment, sizes in bytes, plus LV name,
/// logical start extent and segment type.
pub const PVS_ARGS: &[&str] = &[
    "--noheadings",
    "--segments",
    "-o+lv_name,seg_start_pe,segtype",
    "--units=b",
];

/// Extent size per volume group, in bytes.
pub const VGS_ARGS: &[&str] = &["-o", "vg_name,vg_extent_size", "--noheadings", "--units=b"];

/// Runs the LVM reporting tools on every pull.
#[derive(Debug, Clone)]
pub struct CommandSource {
    pvs_command: String,
    vgs_command: String,
}

impl CommandSource {
    pub fn new(config: &Config) -> Self {
        Self {
            pvs_command: config.pvs_command.clone(),
            vgs_command: config.vgs_command.clone(),
        }
    }
}

impl Default for CommandSource {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl RecordSource for CommandSource {
    fn segment_rows(&mut self) -> Result<Vec<Row<SegmentRecord>>> {
        let output = run(&self.pvs_command, PVS_ARGS)?;
        Ok(parse_segment_lines(&output))
    }

    fn extent_size_rows(&mut self) -> Result<Vec<Row<ExtentSize>>> {
        let output = run(&self.vgs_command, VGS_ARGS)?;
        Ok(parse_extent_size_lines(&output))
    }
}

/// Run `program` and return its stdout. Non-zero exit is an error.
fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!(program, ?args, "running");
    let output = Command::new(program).args(args).output()?;

    if !output.status.success() {
        return Err(MapError::Command {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
