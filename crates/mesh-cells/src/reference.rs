//! Reference cells: shape functions and quadrature for surface cells.
//!
//! Each reference cell maps a fixed parametric domain onto a physical cell
//! through its shape functions. Cell areas are integrated from the Jacobian
//! of that map, so curved (quadratic) and warped cells embedded in 3D are
//! measured the same way as flat ones.
//!
//! Parametric domains and local node order:
//! - [`Triangle3`]: unit right triangle `(0,0) (1,0) (0,1)`.
//! - [`Triangle6`]: as `Triangle3`, then edge midpoints `0-1`, `1-2`, `2-0`.
//! - [`Quad4`]: `[-1, 1]^2`, counter-clockwise from `(-1,-1)`.
//! - [`Quad9`]: as `Quad4`, then edge midpoints `0-1`, `1-2`, `2-3`, `3-0`, then the center.
//!
//! # Example
//!
//! ```
//! use mesh_cells::reference::{ReferenceCell, Triangle3};
//! use nalgebra::Point3;
//!
//! let cell = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(3.0, 0.0, 0.0),
//!     Point3::new(0.0, 4.0, 0.0),
//! ];
//! assert!((Triangle3.cell_area(&cell) - 6.0).abs() < 1e-12);
//! ```

use nalgebra::{Point3, Vector2, Vector3};

use crate::types::VertexArray;

/// A quadrature point on the parametric domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    /// First parametric coordinate.
    pub xi: f64,
    /// Second parametric coordinate.
    pub eta: f64,
    /// Quadrature weight.
    pub weight: f64,
}

impl GaussPoint {
    const fn new(xi: f64, eta: f64, weight: f64) -> Self {
        Self { xi, eta, weight }
    }
}

const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const ONE_THIRD: f64 = 1.0 / 3.0;
// 1/sqrt(3)
const GAUSS2: f64 = 0.577_350_269_189_625_8;
// sqrt(3/5)
const GAUSS3: f64 = 0.774_596_669_241_483_4;
const W3_OUTER: f64 = 5.0 / 9.0;
const W3_CENTER: f64 = 8.0 / 9.0;

static TRIANGLE_1PT: [GaussPoint; 1] = [GaussPoint::new(ONE_THIRD, ONE_THIRD, 0.5)];

static TRIANGLE_3PT: [GaussPoint; 3] = [
    GaussPoint::new(ONE_SIXTH, ONE_SIXTH, ONE_SIXTH),
    GaussPoint::new(TWO_THIRDS, ONE_SIXTH, ONE_SIXTH),
    GaussPoint::new(ONE_SIXTH, TWO_THIRDS, ONE_SIXTH),
];

static QUAD_2X2: [GaussPoint; 4] = [
    GaussPoint::new(-GAUSS2, -GAUSS2, 1.0),
    GaussPoint::new(GAUSS2, -GAUSS2, 1.0),
    GaussPoint::new(GAUSS2, GAUSS2, 1.0),
    GaussPoint::new(-GAUSS2, GAUSS2, 1.0),
];

static QUAD_3X3: [GaussPoint; 9] = [
    GaussPoint::new(-GAUSS3, -GAUSS3, W3_OUTER * W3_OUTER),
    GaussPoint::new(0.0, -GAUSS3, W3_CENTER * W3_OUTER),
    GaussPoint::new(GAUSS3, -GAUSS3, W3_OUTER * W3_OUTER),
    GaussPoint::new(-GAUSS3, 0.0, W3_OUTER * W3_CENTER),
    GaussPoint::new(0.0, 0.0, W3_CENTER * W3_CENTER),
    GaussPoint::new(GAUSS3, 0.0, W3_OUTER * W3_CENTER),
    GaussPoint::new(-GAUSS3, GAUSS3, W3_OUTER * W3_OUTER),
    GaussPoint::new(0.0, GAUSS3, W3_CENTER * W3_OUTER),
    GaussPoint::new(GAUSS3, GAUSS3, W3_OUTER * W3_OUTER),
];

/// Shape-function provider for one geometric cell type.
///
/// Implementors supply the shape functions, their parametric derivatives and
/// a quadrature rule. Mapping, Jacobians and areas are derived from those.
pub trait ReferenceCell: std::fmt::Debug + Send + Sync {
    /// Human-readable name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Number of nodes of the cell.
    fn points_per_cell(&self) -> usize;

    /// Quadrature rule used for area integration.
    fn quadrature(&self) -> &'static [GaussPoint];

    /// Shape function values at `(xi, eta)`, one per node.
    fn shape_functions(&self, xi: f64, eta: f64) -> Vec<f64>;

    /// Shape function derivatives `(dN/dxi, dN/deta)` at `(xi, eta)`, one per node.
    fn shape_derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>>;

    /// Map a parametric point onto the physical cell.
    fn map_to_physical(&self, cell: &[Point3<f64>], xi: f64, eta: f64) -> Point3<f64> {
        let coords = self
            .shape_functions(xi, eta)
            .iter()
            .zip(cell)
            .fold(Vector3::zeros(), |acc, (n, p)| acc + p.coords * *n);
        Point3::from(coords)
    }

    /// Surface Jacobian `|dx/dxi × dx/deta|` at `(xi, eta)`.
    fn jacobian_measure(&self, cell: &[Point3<f64>], xi: f64, eta: f64) -> f64 {
        let (t1, t2) = self.shape_derivatives(xi, eta).iter().zip(cell).fold(
            (Vector3::zeros(), Vector3::zeros()),
            |(t1, t2), (d, p)| (t1 + p.coords * d.x, t2 + p.coords * d.y),
        );
        t1.cross(&t2).norm()
    }

    /// Area of a single cell given its vertices in local node order.
    fn cell_area(&self, cell: &[Point3<f64>]) -> f64 {
        self.quadrature()
            .iter()
            .map(|gp| gp.weight * self.jacobian_measure(cell, gp.xi, gp.eta))
            .sum()
    }

    /// Area of every cell in `vertices`, in order.
    fn cell_areas(&self, vertices: &VertexArray) -> Vec<f64> {
        vertices.cells().map(|cell| self.cell_area(cell)).collect()
    }
}

/// Linear triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangle3;

impl ReferenceCell for Triangle3 {
    fn name(&self) -> &'static str {
        "Triangle3"
    }

    fn points_per_cell(&self) -> usize {
        3
    }

    fn quadrature(&self) -> &'static [GaussPoint] {
        &TRIANGLE_1PT
    }

    fn shape_functions(&self, xi: f64, eta: f64) -> Vec<f64> {
        vec![1.0 - xi - eta, xi, eta]
    }

    fn shape_derivatives(&self, _xi: f64, _eta: f64) -> Vec<Vector2<f64>> {
        vec![
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]
    }
}

/// Quadratic triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangle6;

impl ReferenceCell for Triangle6 {
    fn name(&self) -> &'static str {
        "Triangle6"
    }

    fn points_per_cell(&self) -> usize {
        6
    }

    fn quadrature(&self) -> &'static [GaussPoint] {
        &TRIANGLE_3PT
    }

    fn shape_functions(&self, xi: f64, eta: f64) -> Vec<f64> {
        let (l1, l2, l3) = (1.0 - xi - eta, xi, eta);
        vec![
            l1 * (2.0 * l1 - 1.0),
            l2 * (2.0 * l2 - 1.0),
            l3 * (2.0 * l3 - 1.0),
            4.0 * l1 * l2,
            4.0 * l2 * l3,
            4.0 * l3 * l1,
        ]
    }

    fn shape_derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>> {
        let (l1, l2, l3) = (1.0 - xi - eta, xi, eta);
        let c1 = 4.0 * l1 - 1.0;
        vec![
            Vector2::new(-c1, -c1),
            Vector2::new(4.0 * l2 - 1.0, 0.0),
            Vector2::new(0.0, 4.0 * l3 - 1.0),
            Vector2::new(4.0 * (l1 - l2), -4.0 * l2),
            Vector2::new(4.0 * l3, 4.0 * l2),
            Vector2::new(-4.0 * l3, 4.0 * (l1 - l3)),
        ]
    }
}

const QUAD4_NODES: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Bilinear quadrilateral.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quad4;

impl ReferenceCell for Quad4 {
    fn name(&self) -> &'static str {
        "Quad4"
    }

    fn points_per_cell(&self) -> usize {
        4
    }

    fn quadrature(&self) -> &'static [GaussPoint] {
        &QUAD_2X2
    }

    fn shape_functions(&self, xi: f64, eta: f64) -> Vec<f64> {
        QUAD4_NODES
            .iter()
            .map(|&(xi_i, eta_i)| 0.25 * (1.0 + xi * xi_i) * (1.0 + eta * eta_i))
            .collect()
    }

    fn shape_derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>> {
        QUAD4_NODES
            .iter()
            .map(|&(xi_i, eta_i)| {
                Vector2::new(
                    0.25 * xi_i * (1.0 + eta * eta_i),
                    0.25 * eta_i * (1.0 + xi * xi_i),
                )
            })
            .collect()
    }
}

const QUAD9_NODES: [(f64, f64); 9] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (0.0, -1.0),
    (1.0, 0.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, 0.0),
];

/// 1D quadratic Lagrange basis on nodes -1, 0, 1: (value, derivative).
fn lagrange2(node: f64, t: f64) -> (f64, f64) {
    if node < 0.0 {
        (0.5 * t * (t - 1.0), t - 0.5)
    } else if node > 0.0 {
        (0.5 * t * (t + 1.0), t + 0.5)
    } else {
        (1.0 - t * t, -2.0 * t)
    }
}

/// Biquadratic quadrilateral.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quad9;

impl ReferenceCell for Quad9 {
    fn name(&self) -> &'static str {
        "Quad9"
    }

    fn points_per_cell(&self) -> usize {
        9
    }

    fn quadrature(&self) -> &'static [GaussPoint] {
        &QUAD_3X3
    }

    fn shape_functions(&self, xi: f64, eta: f64) -> Vec<f64> {
        QUAD9_NODES
            .iter()
            .map(|&(xi_i, eta_i)| lagrange2(xi_i, xi).0 * lagrange2(eta_i, eta).0)
            .collect()
    }

    fn shape_derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>> {
        QUAD9_NODES
            .iter()
            .map(|&(xi_i, eta_i)| {
                let (fx, dfx) = lagrange2(xi_i, xi);
                let (fy, dfy) = lagrange2(eta_i, eta);
                Vector2::new(dfx * fy, fx * dfy)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn all_cells() -> Vec<Box<dyn ReferenceCell>> {
        vec![
            Box::new(Triangle3),
            Box::new(Triangle6),
            Box::new(Quad4),
            Box::new(Quad9),
        ]
    }

    #[test]
    fn test_partition_of_unity() {
        for cell in all_cells() {
            for gp in cell.quadrature() {
                let sum: f64 = cell.shape_functions(gp.xi, gp.eta).iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-12);

                let dsum = cell
                    .shape_derivatives(gp.xi, gp.eta)
                    .iter()
                    .fold(Vector2::zeros(), |acc, d| acc + d);
                assert_relative_eq!(dsum.norm(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_quadrature_weights_sum_to_reference_area() {
        let tri: f64 = Triangle3.quadrature().iter().map(|g| g.weight).sum();
        assert_relative_eq!(tri, 0.5, epsilon = 1e-12);
        let tri6: f64 = Triangle6.quadrature().iter().map(|g| g.weight).sum();
        assert_relative_eq!(tri6, 0.5, epsilon = 1e-12);
        let quad: f64 = Quad4.quadrature().iter().map(|g| g.weight).sum();
        assert_relative_eq!(quad, 4.0, epsilon = 1e-12);
        let quad9: f64 = Quad9.quadrature().iter().map(|g| g.weight).sum();
        assert_relative_eq!(quad9, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nodal_interpolation() {
        // Shape function i is 1 at node i and 0 at the others.
        for (i, &(xi, eta)) in QUAD9_NODES.iter().enumerate() {
            let n = Quad9.shape_functions(xi, eta);
            for (j, value) in n.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-12);
            }
        }
        let mid = Triangle6.shape_functions(0.5, 0.0);
        assert_relative_eq!(mid[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle3_area() {
        let cell = [p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(0.0, 4.0, 0.0)];
        assert_eq!(Triangle3.cell_area(&cell), 6.0);

        // Orientation does not change the measure
        let flipped = [cell[0], cell[2], cell[1]];
        assert_eq!(Triangle3.cell_area(&flipped), 6.0);
    }

    #[test]
    fn test_triangle3_in_3d() {
        // Unit right triangle tilted into the xz plane
        let cell = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 1.0)];
        assert_relative_eq!(Triangle3.cell_area(&cell), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle6_straight_sided() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(3.0, 0.0, 0.0);
        let c = p(0.0, 4.0, 0.0);
        let mid = |u: Point3<f64>, v: Point3<f64>| Point3::from((u.coords + v.coords) * 0.5);
        let cell = [a, b, c, mid(a, b), mid(b, c), mid(c, a)];
        assert_relative_eq!(Triangle6.cell_area(&cell), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle6_curved_edge() {
        // Hypotenuse bulged outward by moving its midpoint: the area of a
        // quadratic edge with midpoint offset h over a chord of length L
        // grows by 2/3 * L * h.
        let a = p(0.0, 0.0, 0.0);
        let b = p(1.0, 0.0, 0.0);
        let c = p(0.0, 1.0, 0.0);
        let h = 0.1;
        let n = Vector3::new(1.0, 1.0, 0.0).normalize();
        let bc = Point3::from(p(0.5, 0.5, 0.0).coords + n * h);
        let cell = [a, b, c, p(0.5, 0.0, 0.0), bc, p(0.0, 0.5, 0.0)];
        let chord = 2.0_f64.sqrt();
        assert_relative_eq!(
            Triangle6.cell_area(&cell),
            0.5 + 2.0 / 3.0 * chord * h,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_quad4_rectangle_and_trapezoid() {
        let rect = [
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ];
        assert_relative_eq!(Quad4.cell_area(&rect), 6.0, epsilon = 1e-12);

        let trapezoid = [
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(3.0, 2.0, 0.0),
            p(1.0, 2.0, 0.0),
        ];
        assert_relative_eq!(Quad4.cell_area(&trapezoid), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quad9_matches_quad4_for_flat_cells() {
        let corners = [
            p(0.0, 0.0, 1.0),
            p(2.0, 0.0, 1.0),
            p(2.0, 2.0, 1.0),
            p(0.0, 2.0, 1.0),
        ];
        let nodes: Vec<Point3<f64>> = QUAD9_NODES
            .iter()
            .map(|&(xi, eta)| Quad4.map_to_physical(&corners, xi, eta))
            .collect();
        assert_relative_eq!(Quad9.cell_area(&nodes), 4.0, epsilon = 1e-12);
        assert_relative_eq!(Quad4.cell_area(&corners), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_map_to_physical() {
        let cell = [p(1.0, 1.0, 0.0), p(3.0, 1.0, 0.0), p(1.0, 5.0, 0.0)];
        let centroid = Triangle3.map_to_physical(&cell, ONE_THIRD, ONE_THIRD);
        assert_relative_eq!(centroid.x, 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, 7.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cell_areas_preserves_order() {
        let mut vertices = VertexArray::new(3);
        vertices.push_cell(&[p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(0.0, 4.0, 0.0)]);
        vertices.push_cell(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        assert_eq!(Triangle3.cell_areas(&vertices), vec![6.0, 0.5]);
        assert!(Triangle3.cell_areas(&VertexArray::new(3)).is_empty());
    }
}
