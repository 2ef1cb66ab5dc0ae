//! Tracing extensions for cell mesh operations.
//!
//! Structured logging and timing built on the `tracing` ecosystem:
//!
//! - **Operation timers**: log elapsed time when dropped
//! - **Structured fields**: point, group and cell counts
//! - **Summaries**: measured vs. missing areas
//!
//! # Usage
//!
//! Install a subscriber in your application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // Set RUST_LOG=mesh_cells=debug for per-group output
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: Cell groups without a reference cell (via [`TracingSink`](crate::TracingSink))
//! - **INFO**: Operation timing
//! - **DEBUG**: Per-group extraction and measurement, summaries
//! - **TRACE**: Detailed mesh state

use std::time::Instant;
use tracing::{Span, debug, info, trace};

use crate::CellMesh;
use crate::area::CellAreas;

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// use mesh_cells::tracing_ext::OperationTimer;
///
/// fn expensive_operation() {
///     let _timer = OperationTimer::new("expensive_operation");
///     // ... do work ...
/// } // Timer logs duration when dropped
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("cell_operation", operation = name);
        debug!(target: "mesh_cells::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer with mesh size fields.
    pub fn with_context(name: &'static str, cell_count: usize, point_count: usize) -> Self {
        let span = tracing::info_span!(
            "cell_operation",
            operation = name,
            cells = cell_count,
            points = point_count
        );
        debug!(
            target: "mesh_cells::timing",
            operation = name,
            cells = cell_count,
            points = point_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "mesh_cells::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log cell mesh statistics at debug level.
pub fn log_mesh_stats(mesh: &CellMesh, context: &str) {
    let (min_bounds, max_bounds) = mesh.bounds().unwrap_or_default();
    let dims = max_bounds - min_bounds;

    debug!(
        target: "mesh_cells::mesh_state",
        context = context,
        points = mesh.point_count(),
        groups = mesh.groups().len(),
        cells = mesh.cell_count(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}

/// Log per-group cell counts and registry coverage at trace level.
pub fn log_mesh_stats_detailed(mesh: &CellMesh, context: &str) {
    for group in mesh.groups() {
        trace!(
            target: "mesh_cells::mesh_state",
            context = context,
            key = group.key().as_str(),
            cells = group.cell_count(),
            points_per_cell = group.points_per_cell(),
            has_reference = mesh.registry().contains(group.key().as_str()),
            "Cell group"
        );
    }
}

/// Log the outcome of an area computation.
pub fn log_area_summary(areas: &CellAreas, context: &str) {
    debug!(
        target: "mesh_cells::areas",
        context = context,
        cells = areas.len(),
        groups = areas.spans().len(),
        missing = areas.missing_count(),
        total_area = format!("{:.6}", areas.total_area()),
        "Cell areas computed"
    );
}
