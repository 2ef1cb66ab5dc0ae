//! Example: Area report for a mixed cell mesh
//!
//! Builds a small mesh with linear, quadratic and unsupported cells, prints
//! the per-cell areas and the summary report.
//!
//! Run with: `RUST_LOG=mesh_cells=debug cargo run --example area_report`

use mesh_cells::{CellMeshBuilder, CellResult, TracingSink, compute_cell_areas, keys};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> CellResult<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    //  3----4----5
    //  |    | \  |
    //  0----1----2
    let mesh = CellMeshBuilder::new()
        .points([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.2],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.2],
        ])
        .group(keys::QUAD4, 4, [[0, 1, 4, 3]])
        .group(keys::TRIANGLE3, 3, [[1, 2, 5], [1, 5, 4]])
        .group("polygon4", 4, [[1, 2, 5, 4]])
        .build()?;

    let areas = compute_cell_areas(&mesh, None, &TracingSink)?;
    for (index, area) in areas.iter().enumerate() {
        match area {
            Some(area) => println!("cell {index}: {area:.4}"),
            None => println!("cell {index}: -"),
        }
    }
    println!();
    println!("{areas}");

    let left = compute_cell_areas(&mesh, Some(&[0, 1, 3, 4][..]), &TracingSink)?;
    println!("Left half only: {:?}", left.as_slice());

    Ok(())
}
