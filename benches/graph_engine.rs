//! Benchmarks for the impact analyzer and graph view builder
//!
//! Runs over synthetic inventories shaped like large AEM repositories:
//! a layered hierarchy of categories where every category requires a few
//! categories of the layer below, with some back edges forming cycles.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use clientscope::analysis::Analysis;
use clientscope::inventory::{Clientlib, Inventory, Relation, Usage, UsageKind};
use clientscope::view::{LayoutConfig, VisibleSet};

/// Create a synthetic inventory with `total` categories spread over
/// `layers` layers, each category requiring `fan_out` categories below it.
fn create_inventory(total: usize, layers: usize, fan_out: usize) -> Inventory {
    let per_layer = (total / layers).max(1);
    let category = |i: usize| format!("app.layer{}.lib{}", i / per_layer, i % per_layer);

    let mut inventory = Inventory::default();
    for i in 0..total {
        let mut lib = Clientlib::new(
            format!("/apps/app/clientlibs/lib{}", i),
            format!("lib{}", i),
            [category(i)],
        );
        lib.total_kb = (i % 50) as f64 + 0.5;
        inventory.clientlibs.push(lib);
    }

    for i in 0..total.saturating_sub(per_layer) {
        for k in 0..fan_out {
            let target = (i / per_layer + 1) * per_layer + (i + k) % per_layer;
            if target >= total {
                continue;
            }
            let relation = if k == 0 {
                Relation::embeds(category(i), category(target))
            } else {
                Relation::depends(category(i), category(target))
            };
            inventory.relations.push(relation);
        }
        // Occasional back edge to create cycles
        if i % 97 == 0 && i >= per_layer {
            inventory
                .relations
                .push(Relation::depends(category(i), category(i - per_layer)));
        }
    }

    for i in (0..per_layer.min(total)).step_by(3) {
        inventory.usages.insert(
            category(i),
            vec![Usage::new(UsageKind::Htl, format!("/apps/app/components/c{}.html", i))],
        );
    }

    inventory
}

/// Benchmark building the index and relation graph
fn bench_analysis_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_build");

    for size in [100, 1000, 5000].iter() {
        let inventory = create_inventory(*size, 10, 3);

        group.bench_with_input(BenchmarkId::new("categories", size), &inventory, |b, inv| {
            b.iter(|| black_box(Analysis::new(inv.clone())));
        });
    }

    group.finish();
}

/// Benchmark impact of changing a bottom-layer category (widest cascade)
fn bench_compute_impact(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_impact");

    for size in [100, 1000, 5000].iter() {
        let analysis = Analysis::new(create_inventory(*size, 10, 3));
        let start = vec![analysis
            .inventory()
            .clientlibs
            .last()
            .map(|lib| lib.categories[0].clone())
            .unwrap_or_default()];

        group.bench_with_input(BenchmarkId::new("categories", size), &start, |b, start| {
            b.iter(|| black_box(analysis.analyzer().compute_impact(start)));
        });
    }

    group.finish();
}

/// Benchmark laying out the view of all used categories
fn bench_build_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");
    let config = LayoutConfig::default();

    for size in [100, 1000, 5000].iter() {
        let analysis = Analysis::new(create_inventory(*size, 10, 3));

        group.bench_with_input(BenchmarkId::new("all_used", size), size, |b, _| {
            b.iter(|| black_box(analysis.build_view(&VisibleSet::AllUsed, &config)));
        });

        // Expanding every category shows the whole graph
        let used = analysis.index().used_categories().clone();
        let mut visible = VisibleSet::AllUsed;
        for category in analysis.index().categories() {
            visible.expand(category, &used);
        }
        group.bench_with_input(BenchmarkId::new("fully_expanded", size), size, |b, _| {
            b.iter(|| black_box(analysis.build_view(&visible, &config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analysis_build,
    bench_compute_impact,
    bench_build_view
);
criterion_main!(benches);
