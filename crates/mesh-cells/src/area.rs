//! Per-cell area aggregation over all cell groups of a mesh.
//!
//! Areas come back as one flat sequence: groups in the mesh's insertion
//! order, cells in connectivity order within each group. A group whose cell
//! type has no reference cell contributes one `None` per cell and one
//! warning, never a shorter sequence.
//!
//! # Example
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
//! assert_eq!(areas.as_slice(), &[Some(6.0), Some(0.5)]);
//! assert!(sink.is_empty());
//! ```

use tracing::debug;

use crate::CellMesh;
use crate::diagnostics::{AreaWarning, WarningSink};
use crate::error::{CellError, CellResult};
use crate::mesh::{PointFilter, PointSelection};
use crate::registry::Resolution;
use crate::tracing_ext::{OperationTimer, log_area_summary, log_mesh_stats_detailed};
use crate::types::CellTypeKey;

/// Parameters for area aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "params-config",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AreaParams {
    /// Restrict measurement to cells built from these points.
    /// `None` measures every cell. Default: `None`
    #[cfg_attr(feature = "params-config", serde(default))]
    pub point_indices: Option<Vec<u32>>,

    /// How `point_indices` selects cells. Default: [`PointSelection::AllPoints`]
    #[cfg_attr(feature = "params-config", serde(default))]
    pub selection: PointSelection,
}

impl AreaParams {
    /// Measure every cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict measurement to cells whose points all lie in `points`.
    pub fn with_points(points: impl IntoIterator<Item = u32>) -> Self {
        Self {
            point_indices: Some(points.into_iter().collect()),
            selection: PointSelection::AllPoints,
        }
    }

    /// Keep cells touching at least one of the filter points instead.
    pub fn any_point(mut self) -> Self {
        self.selection = PointSelection::AnyPoint;
        self
    }

    /// The point filter these parameters describe, if any.
    pub fn filter(&self) -> Option<PointFilter> {
        self.point_indices
            .as_ref()
            .map(|points| PointFilter::new(points.iter().copied(), self.selection))
    }

    /// Parse parameters from JSON.
    #[cfg(feature = "params-config")]
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize parameters to pretty JSON.
    #[cfg(feature = "params-config")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Where one cell group sits in a [`CellAreas`] sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpan {
    /// Cell type of the group.
    pub key: CellTypeKey,
    /// Index of the group's first cell in the sequence.
    pub start: usize,
    /// Number of cells of the group in the sequence.
    pub len: usize,
    /// Whether a reference cell was found (areas are `Some`).
    pub resolved: bool,
}

/// Ordered per-cell areas. `None` marks a cell whose type has no reference cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellAreas {
    areas: Vec<Option<f64>>,
    spans: Vec<GroupSpan>,
}

impl CellAreas {
    /// Areas as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Option<f64>] {
        &self.areas
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether no cell was considered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Area of the cell at `index`; outer `None` if out of range.
    pub fn get(&self, index: usize) -> Option<Option<f64>> {
        self.areas.get(index).copied()
    }

    /// Iterate over areas in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.areas.iter().copied()
    }

    /// Group layout of the sequence.
    #[inline]
    pub fn spans(&self) -> &[GroupSpan] {
        &self.spans
    }

    /// Areas of the cells of type `key`.
    pub fn group_areas(&self, key: &str) -> Option<&[Option<f64>]> {
        self.spans
            .iter()
            .find(|span| span.key == key)
            .map(|span| &self.areas[span.start..span.start + span.len])
    }

    /// Keys of groups that had no reference cell.
    pub fn unsupported_keys(&self) -> impl Iterator<Item = &CellTypeKey> + '_ {
        self.spans
            .iter()
            .filter(|span| !span.resolved)
            .map(|span| &span.key)
    }

    /// Number of cells without an area.
    pub fn missing_count(&self) -> usize {
        self.areas.iter().filter(|a| a.is_none()).count()
    }

    /// Whether every cell has an area.
    pub fn is_complete(&self) -> bool {
        self.areas.iter().all(Option::is_some)
    }

    /// Sum of the known areas.
    pub fn total_area(&self) -> f64 {
        self.areas.iter().flatten().sum()
    }

    /// The flat area sequence.
    pub fn into_vec(self) -> Vec<Option<f64>> {
        self.areas
    }

    fn push_group(
        &mut self,
        key: CellTypeKey,
        areas: impl ExactSizeIterator<Item = Option<f64>>,
        resolved: bool,
    ) {
        let start = self.areas.len();
        let len = areas.len();
        self.areas.extend(areas);
        self.spans.push(GroupSpan {
            key,
            start,
            len,
            resolved,
        });
    }
}

impl std::ops::Index<usize> for CellAreas {
    type Output = Option<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.areas[index]
    }
}

impl IntoIterator for CellAreas {
    type Item = Option<f64>;
    type IntoIter = std::vec::IntoIter<Option<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.areas.into_iter()
    }
}

impl std::fmt::Display for CellAreas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cell Areas:")?;
        writeln!(f, "  Cells: {}", self.len())?;
        writeln!(f, "  Missing: {}", self.missing_count())?;
        writeln!(f, "  Total Area: {:.6}", self.total_area())?;
        for span in &self.spans {
            writeln!(
                f,
                "  {}: {} cells{}",
                span.key,
                span.len,
                if span.resolved { "" } else { " (no reference cell)" }
            )?;
        }
        Ok(())
    }
}

/// Compute the area of every cell of `mesh`.
///
/// With `point_indices`, only cells whose points all lie in that set are
/// measured (see [`PointSelection::AllPoints`]).
///
/// For each cell group, in the mesh's insertion order, the group's reference
/// cell is resolved from the mesh registry. Resolved groups are measured in a
/// single call; unresolved groups report one [`AreaWarning`] to `sink` and
/// contribute one `None` per cell.
///
/// # Errors
///
/// Structural problems are returned unchanged and stop the computation:
/// connectivity pointing outside the point table, cells with the wrong
/// number of points, a reference cell bound to a group of a different cell
/// size, or a reference cell returning the wrong number of areas.
pub fn compute_cell_areas(
    mesh: &CellMesh,
    point_indices: Option<&[u32]>,
    sink: &dyn WarningSink,
) -> CellResult<CellAreas> {
    let params = AreaParams {
        point_indices: point_indices.map(<[u32]>::to_vec),
        selection: PointSelection::AllPoints,
    };
    compute_cell_areas_with_params(mesh, &params, sink)
}

/// Compute cell areas with explicit [`AreaParams`].
pub fn compute_cell_areas_with_params(
    mesh: &CellMesh,
    params: &AreaParams,
    sink: &dyn WarningSink,
) -> CellResult<CellAreas> {
    let timer =
        OperationTimer::with_context("compute_cell_areas", mesh.cell_count(), mesh.point_count());
    let _entered = timer.span().enter();

    log_mesh_stats_detailed(mesh, "compute_cell_areas");

    let filter = params.filter();
    let vertices_by_type = mesh.vertices_by_type(filter.as_ref())?;

    let mut result = CellAreas {
        areas: Vec::with_capacity(vertices_by_type.total_cells()),
        spans: Vec::with_capacity(vertices_by_type.len()),
    };

    for (key, vertices) in vertices_by_type {
        let cell_count = vertices.cell_count();

        match mesh.registry().resolve(key.as_str()) {
            Resolution::Resolved(reference) => {
                if reference.points_per_cell() != vertices.points_per_cell() {
                    return Err(CellError::ReferenceMismatch {
                        key: key.to_string(),
                        reference: reference.name(),
                        expected: reference.points_per_cell(),
                        actual: vertices.points_per_cell(),
                    });
                }

                let areas = reference.cell_areas(&vertices);
                if areas.len() != cell_count {
                    return Err(CellError::AreaCountMismatch {
                        key: key.to_string(),
                        reference: reference.name(),
                        expected: cell_count,
                        actual: areas.len(),
                    });
                }

                debug!(
                    key = key.as_str(),
                    reference = reference.name(),
                    cells = cell_count,
                    "Measured cell group"
                );
                result.push_group(key, areas.into_iter().map(Some), true);
            }
            Resolution::Unsupported(_) => {
                sink.warn(&AreaWarning::unsupported_cell_type(key.clone(), cell_count));
                result.push_group(key, std::iter::repeat_n(None, cell_count), false);
            }
        }
    }

    log_area_summary(&result, "compute_cell_areas");
    Ok(result)
}
