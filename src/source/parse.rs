//! Row parsers for `pvs --segments` and `vgs` output.
//!
//! Segment rows come in two shapes, whitespace separated:
//!
//! ```text
//! allocated (11): pv vg fmt attr psize pfree start size lv lv_start segtype
//! free      (10): pv vg fmt attr psize pfree start size    lv_start segtype
//! ```
//!
//! Device size and free space are read past but not kept.

use crate::error::MalformedRecord;
use crate::extent_size::ExtentSize;
use crate::segment::SegmentRecord;
use crate::source::units::parse_size;
use crate::source::Row;

const ALLOCATED_FIELDS: usize = 11;
const FREE_FIELDS: usize = 10;

/// Parse one `pvs` row. Blank lines yield `None`.
pub fn parse_segment_line(line_no: usize, line: &str) -> Option<Row<SegmentRecord>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return None;
    }
    Some(segment_from_fields(line_no, line, &fields))
}

fn segment_from_fields(line_no: usize, line: &str, fields: &[&str]) -> Row<SegmentRecord> {
    let malformed = |reason: String| MalformedRecord::new(line_no, line, reason);
    let number = |name: &str, value: &str| {
        value
            .parse::<u64>()
            .map_err(|_| malformed(format!("invalid {} {:?}", name, value)))
    };

    let (lv_name, lv_start, pv_type) = match fields.len() {
        ALLOCATED_FIELDS => (fields[8], fields[9], fields[10]),
        FREE_FIELDS => ("", fields[8], fields[9]),
        n => {
            return Err(malformed(format!(
                "expected {} or {} fields, got {}",
                FREE_FIELDS, ALLOCATED_FIELDS, n
            )))
        }
    };

    let pv_start = number("pv_start", fields[6])?;
    let pv_length = number("pv_length", fields[7])?;
    let lv_start = number("lv_start", lv_start)?;
    if pv_length == 0 {
        return Err(malformed("zero-length segment".to_string()));
    }
    if pv_start.checked_add(pv_length).is_none() {
        return Err(malformed("physical extent range past 2^64".to_string()));
    }
    if !lv_name.is_empty() && lv_start.checked_add(pv_length).is_none() {
        return Err(malformed("logical extent range past 2^64".to_string()));
    }

    Ok(SegmentRecord {
        pv_name: fields[0].to_string(),
        vg_name: fields[1].to_string(),
        vg_format: fields[2].to_string(),
        vg_attr: fields[3].to_string(),
        lv_name: lv_name.to_string(),
        pv_type: pv_type.to_string(),
        pv_start,
        pv_length,
        lv_start,
    })
}

/// Parse one `vgs` row (`vg_name extent_size`). Blank lines yield `None`.
pub fn parse_extent_size_line(line_no: usize, line: &str) -> Option<Row<ExtentSize>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [] => None,
        [vg_name, size] => Some(
            parse_size(size)
                .map(|pe_size_bytes| ExtentSize {
                    vg_name: vg_name.to_string(),
                    pe_size_bytes,
                })
                .map_err(|reason| MalformedRecord::new(line_no, line, reason)),
        ),
        _ => Some(Err(MalformedRecord::new(
            line_no,
            line,
            format!("expected 2 fields, got {}", fields.len()),
        ))),
    }
}

/// Parse every non-blank line of `pvs` output. Line numbers are 1-based.
pub fn parse_segment_lines(text: &str) -> Vec<Row<SegmentRecord>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_segment_line(i + 1, line))
        .collect()
}

/// Parse every non-blank line of `vgs` output. Line numbers are 1-based.
pub fn parse_extent_size_lines(text: &str) -> Vec<Row<ExtentSize>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_extent_size_line(i + 1, line))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────
