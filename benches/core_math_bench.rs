use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_rs::core::{Axis, AxisConfig, GroupId, Item, ItemId, TimeRange, pack_rows};
use timeline_rs::{TimelineConfig, VirtualizationIndex};

fn staggered_ranges(count: u32) -> Vec<TimeRange> {
    (0..count)
        .map(|i| {
            let start = f64::from(i) * 3.0;
            TimeRange::new(start, start + f64::from(5 + i % 40))
        })
        .collect()
}

fn bench_axis_round_trip(c: &mut Criterion) {
    let axis = Axis::new(
        AxisConfig::new(0.0, 1_000_000_000.0)
            .with_window(500_000_000.0, 500_001_000.0)
            .with_window_size(1_920.0),
    )
    .expect("valid axis");

    c.bench_function("axis_round_trip", |b| {
        b.iter(|| {
            let pos = axis.get_pos(black_box(500_000_321.5));
            let _ = axis.get_value(pos);
        })
    });
}

fn bench_axis_pan_with_resync(c: &mut Criterion) {
    c.bench_function("axis_pan_1k_steps", |b| {
        b.iter(|| {
            let mut axis = Axis::new(
                AxisConfig::new(0.0, 1_000_000_000.0)
                    .with_window(0.0, 1_000.0)
                    .with_window_size(1_000.0),
            )
            .expect("valid axis");
            for _ in 0..1_000 {
                let _ = axis.pan_window(black_box(997.0)).expect("pan");
            }
        })
    });
}

fn bench_pack_rows_50k(c: &mut Criterion) {
    let ranges = staggered_ranges(50_000);

    c.bench_function("pack_rows_50k", |b| {
        b.iter(|| {
            let _ = pack_rows(black_box(ranges.iter().copied()), 0.0, 150_000.0, None);
        })
    });
}

fn bench_group_index_rebuild_100k(c: &mut Criterion) {
    let items: Vec<Item> = (0..100_000_u64)
        .map(|i| {
            let start = (i % 10_000) as f64;
            Item::new(ItemId::new(i), GroupId::new(i % 500), start, start + 25.0)
        })
        .collect();

    c.bench_function("group_index_rebuild_100k", |b| {
        b.iter(|| {
            let config = TimelineConfig::new(0.0, 10_000.0).with_viewport(1_920.0, 1_080.0);
            let mut index = VirtualizationIndex::new(config).expect("valid config");
            index.set_items(black_box(items.clone()));
            let _ = index.rebuild_group_index_now();
        })
    });
}

criterion_group!(
    benches,
    bench_axis_round_trip,
    bench_axis_pan_with_resync,
    bench_pack_rows_50k,
    bench_group_index_rebuild_100k
);
criterion_main!(benches);
