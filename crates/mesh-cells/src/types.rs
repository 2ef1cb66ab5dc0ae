//! Core cell data types.

use std::borrow::Borrow;
use std::slice::ChunksExact;

use nalgebra::Point3;

/// Well-known cell type keys.
pub mod keys {
    /// Linear 3-node triangle.
    pub const TRIANGLE3: &str = "triangle3";
    /// Quadratic 6-node triangle (corners, then edge midpoints).
    pub const TRIANGLE6: &str = "triangle6";
    /// Bilinear 4-node quadrilateral.
    pub const QUAD4: &str = "quad4";
    /// Biquadratic 9-node quadrilateral (corners, edge midpoints, center).
    pub const QUAD9: &str = "quad9";
}

/// Identifies a cell group inside a mesh, e.g. `"triangle3"` or `"quad4"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellTypeKey(String);

impl CellTypeKey {
    /// Create a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CellTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CellTypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CellTypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellTypeKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for CellTypeKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<str> for CellTypeKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CellTypeKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Vertex coordinates of every cell of one type.
///
/// Stored flat: cell `i` occupies `points[i * points_per_cell..(i + 1) * points_per_cell]`,
/// in the local point order of the cell's connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexArray {
    points_per_cell: usize,
    points: Vec<Point3<f64>>,
}

impl VertexArray {
    /// Create an empty array for cells with `points_per_cell` points.
    pub fn new(points_per_cell: usize) -> Self {
        Self {
            points_per_cell,
            points: Vec::new(),
        }
    }

    /// Create an empty array with room for `cell_count` cells.
    pub fn with_capacity(points_per_cell: usize, cell_count: usize) -> Self {
        Self {
            points_per_cell,
            points: Vec::with_capacity(points_per_cell * cell_count),
        }
    }

    /// Append one cell. Callers check the cell size first.
    ///
    /// # Panics
    ///
    /// Panics if `cell.len()` differs from `points_per_cell`.
    pub(crate) fn push_cell(&mut self, cell: &[Point3<f64>]) {
        assert_eq!(
            cell.len(),
            self.points_per_cell,
            "cell has {} points, array holds cells of {}",
            cell.len(),
            self.points_per_cell
        );
        self.points.extend_from_slice(cell);
    }

    /// Number of points in each cell.
    #[inline]
    pub fn points_per_cell(&self) -> usize {
        self.points_per_cell
    }

    /// Number of cells stored.
    #[inline]
    pub fn cell_count(&self) -> usize {
        if self.points_per_cell == 0 {
            0
        } else {
            self.points.len() / self.points_per_cell
        }
    }

    /// Whether no cell is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertices of cell `index`, if it exists.
    pub fn cell(&self, index: usize) -> Option<&[Point3<f64>]> {
        let start = index.checked_mul(self.points_per_cell)?;
        let end = start.checked_add(self.points_per_cell)?;
        if self.points_per_cell == 0 {
            return None;
        }
        self.points.get(start..end)
    }

    /// Iterate over cells, each as a slice of `points_per_cell` vertices.
    pub fn cells(&self) -> ChunksExact<'_, Point3<f64>> {
        self.points.chunks_exact(self.points_per_cell.max(1))
    }

    /// All vertices, cell after cell.
    #[inline]
    pub fn as_points(&self) -> &[Point3<f64>] {
        &self.points
    }
}

/// Per-type vertex arrays, in the mesh's group insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticesByType {
    entries: Vec<(CellTypeKey, VertexArray)>,
}

impl VerticesByType {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the vertices of one type. Order of insertion is iteration order.
    pub fn push(&mut self, key: CellTypeKey, vertices: VertexArray) {
        self.entries.push((key, vertices));
    }

    /// Vertices for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&VertexArray> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    /// Iterate over `(key, vertices)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellTypeKey, &VertexArray)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &CellTypeKey> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Number of cell types.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no cell types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of cells over all types.
    pub fn total_cells(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.cell_count()).sum()
    }
}

impl IntoIterator for VerticesByType {
    type Item = (CellTypeKey, VertexArray);
    type IntoIter = std::vec::IntoIter<(CellTypeKey, VertexArray)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
