//! Benchmarks for cell area aggregation.
//!
//! Run with: cargo bench -p mesh-cells
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-cells -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-cells -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_cells::{
    CellMesh, CellMeshBuilder, CollectingSink, Quad4, Quad9, ReferenceCell, Triangle3, Triangle6,
    compute_cell_areas, keys,
};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a wavy `n x n` patch with the requested cell types.
///
/// Points form a `(2n+1) x (2n+1)` grid so that quadratic cells can use the
/// intermediate nodes. Linear cells only use the even nodes.
fn create_patch(n: usize, types: &[&str]) -> CellMesh {
    let m = 2 * n + 1;
    let idx = |i: usize, j: usize| (j * m + i) as u32;

    let mut builder = CellMeshBuilder::new();
    for j in 0..m {
        for i in 0..m {
            let (x, y) = (i as f64 * 0.5, j as f64 * 0.5);
            builder = builder.point([x, y, 0.1 * x.sin() * y.cos()]);
        }
    }

    for &key in types {
        let mut cells: Vec<Vec<u32>> = Vec::new();
        for cj in 0..n {
            for ci in 0..n {
                let (i, j) = (2 * ci, 2 * cj);
                let p = |di: usize, dj: usize| idx(i + di, j + dj);
                match key {
                    keys::QUAD4 => cells.push(vec![p(0, 0), p(2, 0), p(2, 2), p(0, 2)]),
                    keys::QUAD9 => cells.push(vec![
                        p(0, 0),
                        p(2, 0),
                        p(2, 2),
                        p(0, 2),
                        p(1, 0),
                        p(2, 1),
                        p(1, 2),
                        p(0, 1),
                        p(1, 1),
                    ]),
                    keys::TRIANGLE3 => {
                        cells.push(vec![p(0, 0), p(2, 0), p(2, 2)]);
                        cells.push(vec![p(0, 0), p(2, 2), p(0, 2)]);
                    }
                    keys::TRIANGLE6 => {
                        cells.push(vec![p(0, 0), p(2, 0), p(2, 2), p(1, 0), p(2, 1), p(1, 1)]);
                        cells.push(vec![p(0, 0), p(2, 2), p(0, 2), p(1, 1), p(1, 2), p(0, 1)]);
                    }
                    _ => cells.push(vec![p(0, 0), p(2, 0), p(2, 2), p(0, 2)]),
                }
            }
        }
        let ppc = cells.first().map_or(0, Vec::len);
        builder = builder.group(key, ppc, cells);
    }

    builder.build().expect("benchmark mesh is valid")
}

// =============================================================================
// Aggregation Benchmarks
// =============================================================================

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Aggregation");

    let all_types = [keys::TRIANGLE3, keys::QUAD4, keys::TRIANGLE6, keys::QUAD9];
    let test_cases = [
        ("mixed_8", create_patch(8, &all_types)),
        ("mixed_32", create_patch(32, &all_types)),
        ("mixed_128", create_patch(128, &all_types)),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.cell_count() as u64));

        group.bench_with_input(BenchmarkId::new("all_cells", name), mesh, |b, mesh| {
            b.iter(|| compute_cell_areas(black_box(mesh), None, &CollectingSink::new()))
        });
    }

    group.finish();
}

fn bench_unsupported(c: &mut Criterion) {
    let mut group = c.benchmark_group("Unsupported");

    // Half the cells have no reference cell and are filled with `None`.
    let mesh = create_patch(64, &[keys::QUAD4, "quad4_unregistered"]);
    group.throughput(Throughput::Elements(mesh.cell_count() as u64));

    group.bench_function("half_unsupported_64", |b| {
        b.iter(|| compute_cell_areas(black_box(&mesh), None, &CollectingSink::new()))
    });

    group.finish();
}

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filtered");

    let mesh = create_patch(64, &[keys::TRIANGLE3, keys::QUAD4]);
    let half: Vec<u32> = (0..mesh.point_count() as u32 / 2).collect();
    let all: Vec<u32> = (0..mesh.point_count() as u32).collect();

    group.bench_function("half_points_64", |b| {
        b.iter(|| {
            compute_cell_areas(
                black_box(&mesh),
                Some(black_box(half.as_slice())),
                &CollectingSink::new(),
            )
        })
    });

    group.bench_function("all_points_64", |b| {
        b.iter(|| {
            compute_cell_areas(
                black_box(&mesh),
                Some(black_box(all.as_slice())),
                &CollectingSink::new(),
            )
        })
    });

    group.finish();
}

// =============================================================================
// Reference Cell Benchmarks
// =============================================================================

fn bench_reference_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("ReferenceCells");

    let mesh = create_patch(
        64,
        &[keys::TRIANGLE3, keys::QUAD4, keys::TRIANGLE6, keys::QUAD9],
    );
    let vertices = mesh.vertices_by_type(None).expect("valid mesh");

    let cells: [(&str, &dyn ReferenceCell); 4] = [
        (keys::TRIANGLE3, &Triangle3),
        (keys::QUAD4, &Quad4),
        (keys::TRIANGLE6, &Triangle6),
        (keys::QUAD9, &Quad9),
    ];

    for (key, reference) in cells {
        let Some(verts) = vertices.get(key) else {
            continue;
        };
        group.throughput(Throughput::Elements(verts.cell_count() as u64));

        group.bench_with_input(BenchmarkId::new("cell_areas", key), verts, |b, verts| {
            b.iter(|| reference.cell_areas(black_box(verts)))
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(
    benches,
    bench_aggregation,
    bench_unsupported,
    bench_filtered,
    bench_reference_cells,
);

criterion_main!(benches);
