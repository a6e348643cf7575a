// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use polystat_frame::{Dashboard, DashboardConfig};
use polystat_grid::MetricItem;
use polystat_present::MonospaceMeasurer;

const VIEW: Size = Size::new(1600.0, 900.0);

fn make_items(n: usize) -> Vec<MetricItem> {
    (0..n)
        .map(|i| {
            MetricItem::new(format!("node_cpu_seconds_total_{i}"), (i * 37 % 101) as f64)
                .with_label("job", format!("job-{}", i % 8))
        })
        .collect()
}

fn dashboard(n: usize) -> Dashboard<MonospaceMeasurer> {
    let mut d = Dashboard::new(VIEW, DashboardConfig::default(), MonospaceMeasurer::default());
    d.set_items(make_items(n), Duration::ZERO);
    d
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("polystat_frame");
    group.sample_size(30);

    for &n in &[500_usize, 5_000] {
        let mut d = dashboard(n);
        group.bench_function(format!("frame_flat(n={n})"), |b| {
            b.iter(|| black_box(d.frame(Duration::ZERO).draws.len()));
        });

        // Zoomed in: culling and full-detail text fitting dominate.
        let mut d = dashboard(n);
        for _ in 0..10 {
            d.wheel(-1.0, Point::new(VIEW.width / 2.0, VIEW.height / 2.0));
        }
        group.bench_function(format!("frame_zoomed(n={n})"), |b| {
            b.iter(|| black_box(d.frame(Duration::ZERO).draws.len()));
        });

        let mut d = dashboard(n);
        d.set_group_by(Some("job".to_owned()), Duration::ZERO);
        group.bench_function(format!("frame_grouped(n={n})"), |b| {
            b.iter(|| black_box(d.frame(Duration::ZERO).draws.len()));
        });
    }

    group.bench_function("set_items_and_regroup(n=5000)", |b| {
        b.iter_batched(
            || (dashboard(0), make_items(5_000)),
            |(mut d, items)| {
                d.set_items(items, Duration::ZERO);
                d.set_group_by(Some("job".to_owned()), Duration::ZERO);
                black_box(d.frame(Duration::ZERO).total_cells);
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
