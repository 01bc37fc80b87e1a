//! Lookup benchmark.
//!
//! Contrasts forward lookup (binary search) with reverse lookup (linear
//! scan) as the number of segments grows, plus the cost of a full reload.
//!
//! Run: cargo bench --bench lookup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lvmap::{ExtentMap, SegmentRecord, StaticSource};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `count` one-extent-wide segments spread over 16 LVs and 4 devices.
fn make_segments(count: usize) -> Vec<SegmentRecord> {
    (0..count)
        .map(|i| {
            let lv = format!("lv{}", i % 16);
            let pv = format!("/dev/sd{}", (b'a' + (i % 4) as u8) as char);
            SegmentRecord::allocated(
                "vg0",
                &lv,
                &pv,
                (i / 4) as u64 * 8,
                8,
                (i / 16) as u64 * 8,
            )
        })
        .collect()
}

fn loaded(count: usize) -> ExtentMap {
    let mut map = ExtentMap::new();
    map.reload(&mut StaticSource::new(make_segments(count))).unwrap();
    map
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_owning_segment");
    for count in [1_000, 10_000, 100_000] {
        let map = loaded(count);
        let last_le = (count / 16) as u64 * 8 - 1;
        group.bench_with_input(BenchmarkId::from_parameter(count), &last_le, |b, &le| {
            b.iter(|| black_box(map.find_owning_segment("vg0", "lv15", black_box(le))))
        });
    }
    group.finish();
}

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_owner_at");
    for count in [1_000, 10_000, 100_000] {
        let map = loaded(count);
        let last_pe = (count / 4) as u64 * 8 - 1;
        group.bench_with_input(BenchmarkId::from_parameter(count), &last_pe, |b, &pe| {
            b.iter(|| black_box(map.find_owner_at("vg0", "/dev/sdd", black_box(pe))))
        });
    }
    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");
    for count in [1_000, 10_000] {
        let segments = make_segments(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &segments, |b, segs| {
            b.iter(|| {
                let mut map = ExtentMap::new();
                map.reload(&mut StaticSource::new(segs.clone())).unwrap();
                black_box(map.segment_count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward, bench_reverse, bench_reload);
criterion_main!(benches);
