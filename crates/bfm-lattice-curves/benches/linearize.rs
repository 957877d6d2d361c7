// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Linearization Benchmarks
//!
//! Host path vs device path for every curve mode, single lookups and full
//! box sweeps. Also measures the neighbour lookup pattern of a bond
//! fluctuation move (6 axis neighbours of each site).

use bfm_lattice_curves::{
    device_linearize_batch, linearize_batch, stage_for_launch, BoxExtent, ConstantBank, CurveMode,
    SpaceFillingCurve,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const BOX_SIZES: &[(u32, &str)] = &[(32, "32^3"), (64, "64^3"), (128, "128^3")];

fn sweep_coords(edge: u32) -> Vec<[i32; 3]> {
    let edge = edge as i32;
    let mut coords = Vec::with_capacity((edge * edge * edge) as usize);
    for z in 0..edge {
        for y in 0..edge {
            for x in 0..edge {
                coords.push([x, y, z]);
            }
        }
    }
    coords
}

fn bench_single_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_lookup");
    let extent = BoxExtent::cube(64).unwrap();

    for mode in CurveMode::ALL {
        let curve = SpaceFillingCurve::new(extent, mode).unwrap();
        let constants = curve.device_constants();

        group.bench_function(BenchmarkId::new("host", mode), |b| {
            b.iter(|| curve.linearize(black_box(17i32), black_box(-3), black_box(70)))
        });
        group.bench_function(BenchmarkId::new("device", mode), |b| {
            b.iter(|| {
                mode.device_linearize(
                    black_box(&constants),
                    black_box(17i32),
                    black_box(-3),
                    black_box(70),
                )
            })
        });
    }

    group.finish();
}

fn bench_box_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_sweep");
    let bank = ConstantBank::new();

    for &(edge, label) in BOX_SIZES {
        let extent = BoxExtent::cube(edge).unwrap();
        let coords = sweep_coords(edge);
        group.throughput(Throughput::Elements(coords.len() as u64));

        for mode in CurveMode::ALL {
            let curve = SpaceFillingCurve::new(extent, mode).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("host_{}", mode), label),
                &coords,
                |b, coords| b.iter(|| linearize_batch(&curve, black_box(coords)).unwrap()),
            );

            stage_for_launch(&bank, &curve).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("device_{}", mode), label),
                &coords,
                |b, coords| {
                    b.iter(|| device_linearize_batch(&bank, mode, black_box(coords)).unwrap())
                },
            );
        }
    }

    group.finish();
}

fn bench_neighbour_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbour_lookup");
    let extent = BoxExtent::cube(64).unwrap();
    let sites = sweep_coords(16);
    group.throughput(Throughput::Elements(sites.len() as u64 * 6));

    for mode in CurveMode::ALL {
        let curve = SpaceFillingCurve::new(extent, mode).unwrap();
        group.bench_function(BenchmarkId::from_parameter(mode), |b| {
            b.iter(|| {
                let mut acc = 0u32;
                for &[x, y, z] in &sites {
                    acc ^= curve.linearize(x - 1, y, z) ^ curve.linearize(x + 1, y, z);
                    acc ^= curve.linearize(x, y - 1, z) ^ curve.linearize(x, y + 1, z);
                    acc ^= curve.linearize(x, y, z - 1) ^ curve.linearize(x, y, z + 1);
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_lookup,
    bench_box_sweep,
    bench_neighbour_lookup
);
criterion_main!(benches);
