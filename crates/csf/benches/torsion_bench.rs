//! Criterion benchmarks for the torsion estimators.
//! The grid solver dominates; sizes are cells across the long side.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use csf::prelude::*;
use csf::torsion::{closed_cell_polygon_j, poisson_torsion};

fn bench_torsion(c: &mut Criterion) {
    let mut group = c.benchmark_group("torsion");
    group.sample_size(10);

    let solid = Polygon::new(rectangle(Point::zeros(), 2.0, 1.0), 1.0, "solid").unwrap();
    for &cells in &[25usize, 50, 100] {
        let cfg = SorCfg {
            cells_long: cells,
            ..SorCfg::default()
        };
        group.bench_with_input(BenchmarkId::new("poisson_rect", cells), &cfg, |b, cfg| {
            b.iter(|| poisson_torsion(&solid, cfg).unwrap())
        });
    }

    for &n in &[16usize, 64, 256] {
        let ring = Polygon::with_topology(
            slit_annulus(Point::zeros(), 1.01, 0.99, n),
            1.0,
            "tube",
            Topology::Cell { t: Some(0.02) },
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("bredt_annulus", n), &ring, |b, ring| {
            b.iter(|| closed_cell_polygon_j(ring, 0.0, 1e-9, 1e-3).unwrap())
        });
    }

    let s = Section::new(vec![solid.clone()], 0.0).unwrap();
    let cfg = AnalysisCfg {
        sor: None,
        ..AnalysisCfg::default()
    };
    group.bench_function("full_analysis_no_grid", |b| {
        b.iter(|| section_full_analysis_with(&s, &cfg).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_torsion);
criterion_main!(benches);
