//! Integration test: reload from `pvs`/`vgs` style sources and query.
//!
//! Covers the documented lookup and accounting examples, malformed-row
//! resilience, and randomized layouts checked with proptest.

use std::cmp::Ordering;

use lvmap::source::parse_size;
use lvmap::{ExtentMap, LayoutPolicy, SegmentRecord, StaticSource, StoreState, TextSource};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load(records: Vec<SegmentRecord>) -> ExtentMap {
    let mut map = ExtentMap::new();
    map.reload(&mut StaticSource::new(records)).unwrap();
    map
}

/// Lay out segments described by `(lv, device, length)` triples back to
/// back: each LV grows in logical order, each device fills from PE 0.
fn build_layout(spec: Vec<(usize, usize, u64)>) -> Vec<SegmentRecord> {
    let mut next_le = [0u64; 4];
    let mut next_pe = [0u64; 3];
    let mut records = Vec::new();

    for (lv, dev, len) in spec {
        let lv_name = format!("lv{}", lv);
        let pv_name = format!("/dev/sd{}", (b'a' + dev as u8) as char);
        records.push(SegmentRecord::allocated(
            "vg0",
            &lv_name,
            &pv_name,
            next_pe[dev],
            len,
            next_le[lv],
        ));
        next_le[lv] += len;
        next_pe[dev] += len;
    }

    for (dev, &end) in next_pe.iter().enumerate() {
        let pv_name = format!("/dev/sd{}", (b'a' + dev as u8) as char);
        records.push(SegmentRecord::free("vg0", &pv_name, end, 1000));
    }
    records
}

fn layout() -> impl Strategy<Value = Vec<SegmentRecord>> {
    prop::collection::vec((0usize..4, 0usize..3, 1u64..20), 1..60)
        .prop_map(build_layout)
        .prop_flat_map(|records| Just(records).prop_shuffle())
}

// ---------------------------------------------------------------------------
// Documented examples
// ---------------------------------------------------------------------------

#[test]
fn forward_lookup_across_devices() {
    let map = load(vec![
        SegmentRecord::allocated("vg0", "lv0", "pv0", 0, 10, 0),
        SegmentRecord::allocated("vg0", "lv0", "pv1", 0, 5, 10),
    ]);

    let loc = map.find_owning_segment("vg0", "lv0", 12).unwrap();
    assert_eq!(loc.device, "pv1");
    assert_eq!(loc.pe, 2);

    assert!(map.find_owning_segment("vg0", "lv0", 15).is_none());
}

#[test]
fn reverse_lookup_free_and_missing() {
    let map = load(vec![SegmentRecord::free("vg0", "pv0", 100, 20)]);

    let owner = map.find_owner_at("vg0", "pv0", 110).unwrap();
    assert_eq!(owner.owner, "free");
    assert!(map.find_owner_at("vg0", "pv0", 200).is_none());
}

#[test]
fn free_extent_accounting() {
    let map = load(vec![
        SegmentRecord::free("vg0", "pv0", 0, 5),
        SegmentRecord::allocated("vg0", "lv0", "pv0", 5, 3, 0),
        SegmentRecord::free("vg0", "pv1", 0, 7),
    ]);

    assert_eq!(map.free_extent_count("vg0", Some("pv0")), 5);
    assert_eq!(map.free_extent_count("vg0", None), 12);
}

#[test]
fn used_space_accounting() {
    let map = load(vec![
        SegmentRecord::allocated("vg0", "lv0", "pv0", 0, 4, 0),
        SegmentRecord::allocated("vg0", "lv0", "pv0", 20, 6, 4),
        SegmentRecord::allocated("vg0", "lv1", "pv0", 4, 16, 0),
    ]);

    assert_eq!(map.used_extent_count("vg0", "lv0", "pv0").unwrap(), 10);
}

#[test]
fn unit_conversion() {
    assert_eq!(parse_size("20.00m"), Ok(20 * 1024 * 1024));
    assert_eq!(parse_size("4.00G"), Ok(4 * 1_000_000_000));
    assert!(parse_size("0.00k").is_err());
}

#[test]
fn malformed_row_among_nine_good_rows() {
    let mut pvs = String::new();
    for i in 0..9u64 {
        pvs.push_str(&format!(
            "  /dev/sda vg0 lvm2 a-- 42949672960B 0B {} 10 lv{} 0 linear\n",
            i * 10,
            i
        ));
        if i == 4 {
            pvs.push_str("  /dev/sda vg0 lvm2 a-- garbage\n");
        }
    }

    let mut map = ExtentMap::new();
    let report = map
        .reload(&mut TextSource::new(pvs, "  vg0 4194304B\n"))
        .unwrap();

    assert_eq!(report.segments, 9);
    assert_eq!(report.malformed, 1);
    assert_eq!(map.segment_count(), 9);
    assert_eq!(map.extent_size_bytes("vg0"), 4_194_304);
    assert_eq!(map.find_owning_segment("vg0", "lv8", 3).unwrap().pe, 83);
}

#[test]
fn rows_reaching_past_u64_are_skipped() {
    let pvs = "\
  /dev/sda vg0 lvm2 a-- 1B 1B 18446744073709551610 10 lv0 0 linear
  /dev/sda vg0 lvm2 a-- 1B 1B 0 10 lv1 0 linear
";
    let mut map = ExtentMap::new();
    let report = map.reload(&mut TextSource::new(pvs, "")).unwrap();

    assert_eq!(report.segments, 1);
    assert_eq!(report.malformed, 1);
    assert!(map.find_owning_segment("vg0", "lv0", 7).is_none());
    assert_eq!(map.find_owning_segment("vg0", "lv1", 7).unwrap().pe, 7);
}

#[test]
fn strict_policy_from_config() {
    let mut map = ExtentMap::with_policy(LayoutPolicy::Strict);
    let mut source = StaticSource::new(vec![
        SegmentRecord::allocated("vg0", "lv0", "pv0", 0, 10, 0),
        SegmentRecord::allocated("vg0", "lv0", "pv1", 0, 10, 9),
    ]);
    assert!(map.reload(&mut source).is_err());
    assert_eq!(map.state(), StoreState::Empty);
}

#[test]
fn reverse_scan_is_linear_forward_is_logarithmic() {
    // Both must agree on every extent; the reverse path walks the whole
    // store while the forward path bisects it.
    let map = load(build_layout(
        (0..200).map(|i| (i % 4, i % 3, 1 + (i as u64 % 7))).collect(),
    ));

    for seg in map.segments().iter().filter(|s| !s.is_free()) {
        for le in seg.lv_start..seg.le_end() {
            let loc = map.find_owning_segment("vg0", &seg.lv_name, le).unwrap();
            let owner = map.find_owner_at("vg0", loc.device, loc.pe).unwrap();
            assert_eq!(owner.owner, seg.lv_name);
            assert_eq!(owner.le, le);
        }
    }
}

// ---------------------------------------------------------------------------
// Randomized layouts
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sorted_after_reload(records in layout()) {
        let map = load(records);
        prop_assert_eq!(map.state(), StoreState::Sorted);
        for w in map.segments().windows(2) {
            prop_assert_ne!(w[0].cmp_key(&w[1]), Ordering::Greater);
        }
    }

    #[test]
    fn every_extent_resolves_to_its_segment(records in layout()) {
        let map = load(records.clone());

        for rec in records.iter().filter(|r| !r.is_free()) {
            for le in rec.lv_start..rec.le_end() {
                let loc = map.find_owning_segment(&rec.vg_name, &rec.lv_name, le);
                prop_assert!(loc.is_some(), "LE {} of {} unresolved", le, rec.lv_name);
                let loc = loc.unwrap();
                prop_assert_eq!(loc.device, rec.pv_name.as_str());
                prop_assert_eq!(loc.pe, rec.pv_start + (le - rec.lv_start));
            }
        }
    }

    #[test]
    fn extents_past_the_end_do_not_resolve(records in layout()) {
        let map = load(records.clone());
        for lv in 0..4 {
            let name = format!("lv{}", lv);
            let end = records
                .iter()
                .filter(|r| r.lv_name == name)
                .map(|r| r.le_end())
                .max()
                .unwrap_or(0);
            prop_assert!(map.find_owning_segment("vg0", &name, end).is_none());
        }
    }

    #[test]
    fn free_plus_used_covers_device(records in layout()) {
        let map = load(records.clone());
        for dev in ["/dev/sda", "/dev/sdb", "/dev/sdc"] {
            let used: u64 = (0..4)
                .map(|lv| map.used_extent_count("vg0", &format!("lv{}", lv), dev).unwrap())
                .sum();
            let total: u64 = records
                .iter()
                .filter(|r| r.pv_name == dev)
                .map(|r| r.pv_length)
                .sum();
            prop_assert_eq!(used + map.free_extent_count("vg0", Some(dev)), total);
        }
    }
}
