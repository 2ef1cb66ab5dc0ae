//! Mesh of cell groups sharing one point table.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::debug;

use crate::area::{AreaParams, CellAreas, compute_cell_areas_with_params};
use crate::diagnostics::{TracingSink, WarningSink};
use crate::error::{CellError, CellResult};
use crate::registry::ReferenceRegistry;
use crate::types::{CellTypeKey, VertexArray, VerticesByType};

/// How a point filter decides whether a cell is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "params-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PointSelection {
    /// Keep a cell when every one of its points is in the filter.
    #[default]
    AllPoints,
    /// Keep a cell when at least one of its points is in the filter.
    AnyPoint,
}

/// Restricts vertex extraction to cells defined by a set of points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointFilter {
    points: HashSet<u32>,
    selection: PointSelection,
}

impl PointFilter {
    /// Create a filter from point indices and a selection rule.
    pub fn new(points: impl IntoIterator<Item = u32>, selection: PointSelection) -> Self {
        Self {
            points: points.into_iter().collect(),
            selection,
        }
    }

    /// Keep cells whose points all belong to `points`.
    pub fn all_of(points: impl IntoIterator<Item = u32>) -> Self {
        Self::new(points, PointSelection::AllPoints)
    }

    /// Keep cells with at least one point in `points`.
    pub fn any_of(points: impl IntoIterator<Item = u32>) -> Self {
        Self::new(points, PointSelection::AnyPoint)
    }

    /// The selection rule.
    pub fn selection(&self) -> PointSelection {
        self.selection
    }

    /// Whether point `index` is in the filter.
    pub fn contains_point(&self, index: u32) -> bool {
        self.points.contains(&index)
    }

    /// Whether a cell with the given connectivity is kept.
    pub fn keeps(&self, cell: &[u32]) -> bool {
        match self.selection {
            PointSelection::AllPoints => cell.iter().all(|p| self.points.contains(p)),
            PointSelection::AnyPoint => cell.iter().any(|p| self.points.contains(p)),
        }
    }
}

/// All cells of one geometric type.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGroup {
    key: CellTypeKey,
    points_per_cell: usize,
    /// Cell index -> ordered point indices.
    connectivity: Vec<Vec<u32>>,
}

impl CellGroup {
    /// Create an empty group of cells with `points_per_cell` points.
    pub fn new(key: impl Into<CellTypeKey>, points_per_cell: usize) -> Self {
        Self {
            key: key.into(),
            points_per_cell,
            connectivity: Vec::new(),
        }
    }

    /// Create a group from an existing connectivity table.
    ///
    /// The table is taken as-is; cells of the wrong size are reported when
    /// vertices are extracted.
    pub fn with_connectivity(
        key: impl Into<CellTypeKey>,
        points_per_cell: usize,
        connectivity: Vec<Vec<u32>>,
    ) -> Self {
        Self {
            key: key.into(),
            points_per_cell,
            connectivity,
        }
    }

    /// Append one cell.
    pub fn push_cell(&mut self, points: impl Into<Vec<u32>>) {
        self.connectivity.push(points.into());
    }

    /// The group's cell type key.
    #[inline]
    pub fn key(&self) -> &CellTypeKey {
        &self.key
    }

    /// Declared number of points per cell.
    #[inline]
    pub fn points_per_cell(&self) -> usize {
        self.points_per_cell
    }

    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.connectivity.len()
    }

    /// Connectivity of cell `index`.
    pub fn cell(&self, index: usize) -> Option<&[u32]> {
        self.connectivity.get(index).map(Vec::as_slice)
    }

    /// Iterate over cell connectivities in order.
    pub fn cells(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.connectivity.iter().map(Vec::as_slice)
    }

    /// Gather the vertices of the cells kept by `filter` (all cells if `None`).
    ///
    /// Every cell is checked, kept or not: a wrong point count or an index
    /// outside `points` is an error.
    pub fn vertices(
        &self,
        points: &[Point3<f64>],
        filter: Option<&PointFilter>,
    ) -> CellResult<VertexArray> {
        let mut vertices = VertexArray::with_capacity(self.points_per_cell, self.cell_count());
        let mut scratch = Vec::with_capacity(self.points_per_cell);

        for (cell_index, cell) in self.connectivity.iter().enumerate() {
            if cell.len() != self.points_per_cell {
                return Err(CellError::cell_size_mismatch(
                    self.key.as_str(),
                    cell_index,
                    self.points_per_cell,
                    cell.len(),
                ));
            }

            scratch.clear();
            for &point_index in cell {
                let point = points.get(point_index as usize).ok_or_else(|| {
                    CellError::invalid_point_index(
                        self.key.as_str(),
                        cell_index,
                        point_index,
                        points.len(),
                    )
                })?;
                scratch.push(*point);
            }

            if filter.is_none_or(|f| f.keeps(cell)) {
                vertices.push_cell(&scratch);
            }
        }

        Ok(vertices)
    }
}

/// A mesh made of cell groups of possibly different types.
///
/// Groups keep their insertion order; that order is the outer order of every
/// per-cell result. Reference cells are looked up by group key in the
/// mesh's [`ReferenceRegistry`].
#[derive(Debug, Clone, Default)]
pub struct CellMesh {
    points: Vec<Point3<f64>>,
    groups: Vec<CellGroup>,
    group_index: HashMap<CellTypeKey, usize>,
    registry: ReferenceRegistry,
}

impl CellMesh {
    /// Create a mesh over `points` with the built-in reference cells.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self::with_registry(points, ReferenceRegistry::with_defaults())
    }

    /// Create a mesh over `points` with a custom registry.
    pub fn with_registry(points: Vec<Point3<f64>>, registry: ReferenceRegistry) -> Self {
        Self {
            points,
            groups: Vec::new(),
            group_index: HashMap::new(),
            registry,
        }
    }

    /// Append a cell group.
    ///
    /// Fails if its key is already present or if its cells are declared with
    /// zero points, since such cells could not be measured or counted.
    pub fn add_group(&mut self, group: CellGroup) -> CellResult<()> {
        if group.points_per_cell == 0 {
            return Err(CellError::invalid_group(
                group.key.as_str(),
                "cells must have at least one point",
            ));
        }
        if self.group_index.contains_key(group.key.as_str()) {
            return Err(CellError::DuplicateCellType {
                key: group.key.to_string(),
            });
        }
        self.group_index.insert(group.key.clone(), self.groups.len());
        self.groups.push(group);
        Ok(())
    }

    /// Point coordinates.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Groups in insertion order.
    #[inline]
    pub fn groups(&self) -> &[CellGroup] {
        &self.groups
    }

    /// Group for `key`, if present.
    pub fn group(&self, key: &str) -> Option<&CellGroup> {
        self.group_index.get(key).map(|&i| &self.groups[i])
    }

    /// Total number of cells over all groups.
    pub fn cell_count(&self) -> usize {
        self.groups.iter().map(CellGroup::cell_count).sum()
    }

    /// Number of cells of type `key` (0 if absent).
    pub fn cell_count_of(&self, key: &str) -> usize {
        self.group(key).map_or(0, CellGroup::cell_count)
    }

    /// The reference-cell registry.
    #[inline]
    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for setup before measuring.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut ReferenceRegistry {
        &mut self.registry
    }

    /// Axis-aligned bounding box as (min_corner, max_corner), or `None` if
    /// the mesh has no points.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        Some(self.points[1..].iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Vertex coordinates per cell type, restricted by `filter`.
    ///
    /// Every group appears in the result, in insertion order, even when the
    /// filter keeps none of its cells.
    pub fn vertices_by_type(&self, filter: Option<&PointFilter>) -> CellResult<VerticesByType> {
        let mut by_type = VerticesByType::new();
        for group in &self.groups {
            let vertices = group.vertices(&self.points, filter)?;
            debug!(
                key = group.key.as_str(),
                kept = vertices.cell_count(),
                total = group.cell_count(),
                "Extracted cell vertices"
            );
            by_type.push(group.key.clone(), vertices);
        }
        Ok(by_type)
    }

    /// Areas of all cells, or of those selected by `point_indices`.
    ///
    /// Warnings go to `tracing`. See [`compute_cell_areas`](crate::compute_cell_areas).
    pub fn cell_areas(&self, point_indices: Option<&[u32]>) -> CellResult<CellAreas> {
        self.cell_areas_with_sink(point_indices, &TracingSink)
    }

    /// Like [`cell_areas`](Self::cell_areas), reporting warnings to `sink`.
    pub fn cell_areas_with_sink(
        &self,
        point_indices: Option<&[u32]>,
        sink: &dyn WarningSink,
    ) -> CellResult<CellAreas> {
        let params = AreaParams {
            point_indices: point_indices.map(<[u32]>::to_vec),
            ..AreaParams::default()
        };
        compute_cell_areas_with_params(self, &params, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mesh() -> CellMesh {
        // 0---3---5
        // | / |   |
        // 1---2---4
        let points = vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mut mesh = CellMesh::new(points);
        mesh.add_group(CellGroup::with_connectivity(
            "triangle3",
            3,
            vec![vec![0, 1, 3], vec![1, 2, 3]],
        ))
        .unwrap();
        mesh.add_group(CellGroup::with_connectivity(
            "quad4",
            4,
            vec![vec![2, 4, 5, 3]],
        ))
        .unwrap();
        mesh
    }

    #[test]
    fn test_counts_and_lookup() {
        let mesh = square_mesh();
        assert_eq!(mesh.point_count(), 6);
        assert_eq!(mesh.cell_count(), 3);
        assert_eq!(mesh.cell_count_of("triangle3"), 2);
        assert_eq!(mesh.cell_count_of("hexa8"), 0);
        assert_eq!(mesh.group("quad4").unwrap().cell(0), Some(&[2, 4, 5, 3][..]));
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mut mesh = square_mesh();
        let err = mesh.add_group(CellGroup::new("quad4", 4)).unwrap_err();
        assert!(matches!(err, CellError::DuplicateCellType { .. }));
        assert_eq!(mesh.groups().len(), 2);
    }

    #[test]
    fn test_zero_point_group_rejected() {
        let mut mesh = CellMesh::new(vec![Point3::origin(); 3]);
        let err = mesh
            .add_group(CellGroup::with_connectivity(
                "vertex0",
                0,
                vec![vec![], vec![], vec![]],
            ))
            .unwrap_err();
        assert!(matches!(err, CellError::InvalidGroup { .. }));
        assert!(err.is_structural());
        assert!(mesh.groups().is_empty());
        assert_eq!(mesh.cell_count(), 0);
    }

    #[test]
    fn test_bounds() {
        let mesh = square_mesh();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
        assert!(CellMesh::default().bounds().is_none());
    }

    #[test]
    fn test_vertices_by_type_order() {
        let mesh = square_mesh();
        let by_type = mesh.vertices_by_type(None).unwrap();
        let keys: Vec<&str> = by_type.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["triangle3", "quad4"]);

        let tris = by_type.get("triangle3").unwrap();
        assert_eq!(tris.cell_count(), 2);
        assert_eq!(tris.cell(1).unwrap()[0], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_filter_all_points() {
        let mesh = square_mesh();
        let filter = PointFilter::all_of([0, 1, 2, 3]);
        let by_type = mesh.vertices_by_type(Some(&filter)).unwrap();
        assert_eq!(by_type.get("triangle3").unwrap().cell_count(), 2);
        // The quad uses points 4 and 5: dropped, but its group is still listed
        assert_eq!(by_type.get("quad4").unwrap().cell_count(), 0);
        assert_eq!(by_type.len(), 2);
    }

    #[test]
    fn test_filter_any_point() {
        let mesh = square_mesh();
        let filter = PointFilter::any_of([4]);
        let by_type = mesh.vertices_by_type(Some(&filter)).unwrap();
        assert_eq!(by_type.get("triangle3").unwrap().cell_count(), 0);
        assert_eq!(by_type.get("quad4").unwrap().cell_count(), 1);

        let filter = PointFilter::any_of([3]);
        assert_eq!(mesh.vertices_by_type(Some(&filter)).unwrap().total_cells(), 3);
    }

    #[test]
    fn test_full_filter_equals_no_filter() {
        let mesh = square_mesh();
        let all: Vec<u32> = (0..mesh.point_count() as u32).collect();
        let unfiltered = mesh.vertices_by_type(None).unwrap();
        for filter in [PointFilter::all_of(all.clone()), PointFilter::any_of(all)] {
            assert_eq!(mesh.vertices_by_type(Some(&filter)).unwrap(), unfiltered);
        }
    }

    #[test]
    fn test_invalid_point_index() {
        let mut mesh = CellMesh::new(vec![Point3::origin(); 3]);
        mesh.add_group(CellGroup::with_connectivity("triangle3", 3, vec![vec![0, 1, 7]]))
            .unwrap();
        let err = mesh.vertices_by_type(None).unwrap_err();
        match err {
            CellError::InvalidPointIndex {
                cell_index,
                point_index,
                point_count,
                ..
            } => {
                assert_eq!(cell_index, 0);
                assert_eq!(point_index, 7);
                assert_eq!(point_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_size_mismatch_even_when_filtered_out() {
        let mut mesh = CellMesh::new(vec![Point3::origin(); 4]);
        mesh.add_group(CellGroup::with_connectivity(
            "triangle3",
            3,
            vec![vec![0, 1, 2], vec![0, 1, 2, 3]],
        ))
        .unwrap();
        let filter = PointFilter::all_of([0, 1, 2]);
        let err = mesh.vertices_by_type(Some(&filter)).unwrap_err();
        assert!(matches!(
            err,
            CellError::CellSizeMismatch {
                cell_index: 1,
                expected: 3,
                actual: 4,
                ..
            }
        ));
    }
}
