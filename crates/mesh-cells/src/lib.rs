//! Per-cell surface areas for meshes made of mixed cell types.
//!
//! A [`CellMesh`] holds one point table and any number of cell groups, one per
//! cell type (`triangle3`, `quad4`, ...). Each group's cells are measured with
//! the reference cell registered for its key, by integrating the Jacobian of
//! the reference-to-physical map with Gauss quadrature.
//!
//! # Features
//!
//! - **Mixed meshes**: linear and quadratic triangles and quadrilaterals
//! - **3D surfaces**: cells may be warped or curved in space
//! - **Point filters**: measure only cells built from a subset of points
//! - **Graceful gaps**: cell types without a reference cell yield `None` per
//!   cell and one warning, the rest of the mesh is still measured
//! - **Extensible**: register your own [`ReferenceCell`] under any key
//!
//! # Result Layout
//!
//! [`compute_cell_areas`] returns one entry per considered cell. Groups appear
//! in the order they were added to the mesh, cells in connectivity order
//! within each group. The [`GroupSpan`]s of a [`CellAreas`] record where each
//! group starts.
//!
//! # Quick Start
//!
//! ```
//! use mesh_cells::{CellMeshBuilder, CollectingSink, compute_cell_areas};
//!
//! let mesh = CellMeshBuilder::new()
//!     .points([[0.0, 0.0], [3.0, 0.0], [0.0, 4.0], [1.0, 0.0], [0.0, 1.0]])
//!     .group("triangle3", 3, [[0, 1, 2], [0, 3, 4]])
//!     .build()
//!     .unwrap();
//!
//! let sink = CollectingSink::new();
//! let areas = compute_cell_areas(&mesh, None, &sink).unwrap();
//! assert_eq!(areas.into_vec(), vec![Some(6.0), Some(0.5)]);
//! ```
//!
//! # Unsupported Cell Types
//!
//! ```
//! use mesh_cells::{CellMeshBuilder, CollectingSink, compute_cell_areas};
//!
//! let mesh = CellMeshBuilder::new()
//!     .points([[0.0, 0.0], [3.0, 0.0], [0.0, 4.0], [1.0, 0.0], [0.0, 1.0]])
//!     .group("triangle3", 3, [[0, 1, 2], [0, 3, 4]])
//!     .unregister("triangle3")
//!     .build()
//!     .unwrap();
//!
//! let sink = CollectingSink::new();
//! let areas = compute_cell_areas(&mesh, None, &sink).unwrap();
//! assert_eq!(areas.as_slice(), &[None, None]);
//! assert!(sink.warnings()[0].message.contains("triangle3"));
//! ```
//!
//! # Filtering by Points
//!
//! ```
//! use mesh_cells::{CellMeshBuilder, TracingSink, compute_cell_areas};
//!
//! let mesh = CellMeshBuilder::new()
//!     .points([[0.0, 0.0], [3.0, 0.0], [0.0, 4.0], [1.0, 0.0], [0.0, 1.0]])
//!     .group("triangle3", 3, [[0, 1, 2], [0, 3, 4]])
//!     .build()
//!     .unwrap();
//!
//! // Only the second triangle has all of its points in the set.
//! let areas = compute_cell_areas(&mesh, Some(&[0, 3, 4][..]), &TracingSink).unwrap();
//! assert_eq!(areas.as_slice(), &[Some(0.5)]);
//! ```

mod area;
mod builder;
mod diagnostics;
mod error;
mod mesh;
mod types;

pub mod reference;
pub mod registry;
pub mod tracing_ext;

// Re-export core types at crate root
pub use error::{CellError, CellLocation, CellResult, ErrorCode, RecoverySuggestion};
pub use types::{CellTypeKey, VertexArray, VerticesByType, keys};

pub use mesh::{CellGroup, CellMesh, PointFilter, PointSelection};
pub use builder::{CellMeshBuilder, IntoPoint};

pub use area::{
    AreaParams, CellAreas, GroupSpan, compute_cell_areas, compute_cell_areas_with_params,
};
pub use diagnostics::{AreaWarning, CollectingSink, TracingSink, WarningSink};

pub use reference::{GaussPoint, Quad4, Quad9, ReferenceCell, Triangle3, Triangle6};
pub use registry::{ReferenceRegistry, Resolution};
