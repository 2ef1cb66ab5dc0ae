//! Fluent builder for cell meshes.
//!
//! Points, groups and reference-cell bindings are queued and checked when
//! `build()` is called.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mesh_cells::CellMeshBuilder;
//! use mesh_cells::reference::Triangle6;
//!
//! let mesh = CellMeshBuilder::new()
//!     .points([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]])
//!     .group("quad4", 4, [[0, 1, 2, 3]])
//!     .group("triangle3", 3, [[0, 1, 2], [0, 2, 3]])
//!     .register("tri6", Arc::new(Triangle6))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.cell_count(), 3);
//! assert!(mesh.registry().contains("tri6"));
//! ```

use std::sync::Arc;

use nalgebra::{Point2, Point3};

use crate::error::{CellError, CellResult};
use crate::mesh::{CellGroup, CellMesh};
use crate::reference::ReferenceCell;
use crate::registry::ReferenceRegistry;
use crate::tracing_ext::log_mesh_stats;
use crate::types::CellTypeKey;

/// Conversion into a mesh point. 2D inputs get `z = 0`.
pub trait IntoPoint {
    /// Convert into a 3D point.
    fn into_point(self) -> Point3<f64>;
}

impl IntoPoint for Point3<f64> {
    fn into_point(self) -> Point3<f64> {
        self
    }
}

impl IntoPoint for Point2<f64> {
    fn into_point(self) -> Point3<f64> {
        Point3::new(self.x, self.y, 0.0)
    }
}

impl IntoPoint for [f64; 3] {
    fn into_point(self) -> Point3<f64> {
        Point3::from(self)
    }
}

impl IntoPoint for [f64; 2] {
    fn into_point(self) -> Point3<f64> {
        Point3::new(self[0], self[1], 0.0)
    }
}

/// Queued registry change.
#[derive(Debug, Clone)]
enum RegistryOp {
    Register(CellTypeKey, Arc<dyn ReferenceCell>),
    Remove(String),
}

/// Fluent builder for [`CellMesh`].
///
/// Groups keep the order in which they are added. Registry changes are
/// applied in order on top of the built-in reference cells, unless
/// [`without_defaults`](Self::without_defaults) or
/// [`registry`](Self::registry) is used.
///
/// `build()` rejects non-finite coordinates, duplicate group keys and groups
/// with zero points per cell. Connectivity is not checked here: malformed
/// cells surface when vertices are extracted.
#[derive(Debug, Clone)]
pub struct CellMeshBuilder {
    points: Vec<Point3<f64>>,
    groups: Vec<CellGroup>,
    registry: ReferenceRegistry,
    registry_ops: Vec<RegistryOp>,
}

impl Default for CellMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CellMeshBuilder {
    /// Create a builder with the built-in reference cells.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            groups: Vec::new(),
            registry: ReferenceRegistry::with_defaults(),
            registry_ops: Vec::new(),
        }
    }

    /// Start from an empty registry.
    pub fn without_defaults(mut self) -> Self {
        self.registry = ReferenceRegistry::new();
        self
    }

    /// Replace the registry.
    pub fn registry(mut self, registry: ReferenceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Append one point.
    pub fn point(mut self, point: impl IntoPoint) -> Self {
        self.points.push(point.into_point());
        self
    }

    /// Append several points.
    pub fn points<P: IntoPoint>(mut self, points: impl IntoIterator<Item = P>) -> Self {
        self.points
            .extend(points.into_iter().map(IntoPoint::into_point));
        self
    }

    /// Append a group of cells sharing `points_per_cell`.
    pub fn group<C: AsRef<[u32]>>(
        mut self,
        key: impl Into<CellTypeKey>,
        points_per_cell: usize,
        cells: impl IntoIterator<Item = C>,
    ) -> Self {
        let connectivity = cells.into_iter().map(|c| c.as_ref().to_vec()).collect();
        self.groups.push(CellGroup::with_connectivity(
            key,
            points_per_cell,
            connectivity,
        ));
        self
    }

    /// Append a prepared group.
    pub fn cell_group(mut self, group: CellGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Append one cell to the group `key`, creating the group if needed.
    ///
    /// A new group takes its size from this first cell.
    pub fn cell(mut self, key: impl Into<CellTypeKey>, points: impl AsRef<[u32]>) -> Self {
        let key = key.into();
        let points = points.as_ref();
        match self.groups.iter_mut().find(|g| *g.key() == key) {
            Some(group) => group.push_cell(points),
            None => {
                let mut group = CellGroup::new(key, points.len());
                group.push_cell(points);
                self.groups.push(group);
            }
        }
        self
    }

    /// Bind `key` to a reference cell.
    pub fn register(mut self, key: impl Into<CellTypeKey>, cell: Arc<dyn ReferenceCell>) -> Self {
        self.registry_ops
            .push(RegistryOp::Register(key.into(), cell));
        self
    }

    /// Remove the binding for `key`, leaving its cells without areas.
    pub fn unregister(mut self, key: impl Into<String>) -> Self {
        self.registry_ops.push(RegistryOp::Remove(key.into()));
        self
    }

    /// Check the queued data and build the mesh.
    pub fn build(self) -> CellResult<CellMesh> {
        for (index, p) in self.points.iter().enumerate() {
            for (coordinate, value) in [("x", p.x), ("y", p.y), ("z", p.z)] {
                if !value.is_finite() {
                    return Err(CellError::invalid_coordinate(index, coordinate, value));
                }
            }
        }

        let mut registry = self.registry;
        for op in self.registry_ops {
            match op {
                RegistryOp::Register(key, cell) => {
                    registry.register(key, cell);
                }
                RegistryOp::Remove(key) => {
                    registry.remove(&key);
                }
            }
        }

        let mut mesh = CellMesh::with_registry(self.points, registry);
        for group in self.groups {
            mesh.add_group(group)?;
        }

        log_mesh_stats(&mesh, "build");
        Ok(mesh)
    }
}
