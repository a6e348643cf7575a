// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Size, Vec2};
use polystat_cluster::{ByLabel, ClusterConfig, FilterStack, cluster};
use polystat_grid::{CellRadius, MetricItem, layout_honeycomb};
use polystat_view2d::ViewTransform;
use polystat_virtual::VirtualizationFilter;

const VIEW: Size = Size::new(1600.0, 900.0);

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }
}

fn make_items(n: usize, groups: u32, seed: u64) -> Vec<MetricItem> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|i| {
            let group = rng.next_u32() % groups;
            MetricItem::new(format!("series_{i}"), rng.next_f64() * 100.0)
                .with_label("instance", format!("host-{group}"))
        })
        .collect()
}

fn bench_honeycomb(c: &mut Criterion) {
    let mut group = c.benchmark_group("polystat_grid");
    for &n in &[100_usize, 1_000, 5_000] {
        let items = make_items(n, 1, 0x9E37_79B9_0000_0001);
        let radius = CellRadius::default().resolve(n, VIEW).unwrap_or(10.0);
        group.bench_function(format!("layout_honeycomb(n={n})"), |b| {
            b.iter(|| black_box(layout_honeycomb(black_box(&items), VIEW, radius).len()));
        });
    }
    group.finish();
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("polystat_cluster");
    let filters = FilterStack::new();
    let config = ClusterConfig::default();
    for &(n, groups) in &[(1_000_usize, 4_u32), (5_000, 16), (5_000, 64)] {
        let items = make_items(n, groups, 0x9E37_79B9_0000_0002);
        let selector = ByLabel::new("instance");
        group.bench_function(format!("cluster(n={n},groups={groups})"), |b| {
            b.iter(|| {
                let layout = cluster(black_box(&items), &selector, &filters, VIEW, &config);
                black_box(layout.cells.len())
            });
        });
    }
    group.finish();
}

fn bench_cull(c: &mut Criterion) {
    let mut group = c.benchmark_group("polystat_virtual");
    let items = make_items(5_000, 1, 0x9E37_79B9_0000_0003);
    let radius = CellRadius::default().resolve(items.len(), VIEW).unwrap_or(10.0);
    let cells = layout_honeycomb(&items, VIEW, radius);
    let filter = VirtualizationFilter::default();

    for &zoom in &[1.0_f64, 4.0, 16.0] {
        let transform = ViewTransform::new(zoom, Vec2::new(-VIEW.width, -VIEW.height));
        let mut out = Vec::new();
        group.bench_function(format!("cull_into(n=5000,zoom={zoom})"), |b| {
            b.iter(|| {
                filter.cull_into(&cells, transform, VIEW, radius, &mut out);
                black_box(out.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_honeycomb, bench_cluster, bench_cull);
criterion_main!(benches);
