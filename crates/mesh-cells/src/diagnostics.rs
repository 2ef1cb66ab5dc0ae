//! Warning sinks for recoverable conditions during area aggregation.
//!
//! The aggregator never logs through global state directly: callers pass a
//! [`WarningSink`]. [`TracingSink`] forwards to `tracing` and is what the
//! convenience methods on [`CellMesh`](crate::CellMesh) use. [`CollectingSink`]
//! keeps the warnings for later inspection.
//!
//! ```
//! use mesh_cells::{AreaWarning, CollectingSink, WarningSink};
//!
//! let sink = CollectingSink::new();
//! sink.warn(&AreaWarning::unsupported_cell_type("hexa8", 12));
//! assert_eq!(sink.len(), 1);
//! assert!(sink.warnings()[0].message.contains("hexa8"));
//! ```

use std::sync::Mutex;

use tracing::warn;

use crate::error::{CellError, ErrorCode};
use crate::types::CellTypeKey;

/// A recoverable condition reported while computing areas.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaWarning {
    /// Error code of the underlying condition.
    pub code: ErrorCode,
    /// Cell type the warning refers to.
    pub key: CellTypeKey,
    /// Number of cells whose area is missing because of it.
    pub cell_count: usize,
    /// Human-readable message.
    pub message: String,
}

impl AreaWarning {
    /// Warning for a cell type without a registered reference cell.
    pub fn unsupported_cell_type(key: impl Into<CellTypeKey>, cell_count: usize) -> Self {
        let key = key.into();
        let message = CellError::unsupported_cell_type(key.as_str()).to_string();
        Self {
            code: ErrorCode::UnsupportedCellType,
            key,
            cell_count,
            message,
        }
    }
}

impl std::fmt::Display for AreaWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({} cells without area)",
            self.code, self.message, self.cell_count
        )
    }
}

/// Receiver for [`AreaWarning`]s. Fire-and-forget.
pub trait WarningSink {
    /// Report one warning.
    fn warn(&self, warning: &AreaWarning);
}

impl<F> WarningSink for F
where
    F: Fn(&AreaWarning),
{
    fn warn(&self, warning: &AreaWarning) {
        self(warning)
    }
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &AreaWarning) {
        warn!(
            target: "mesh_cells::areas",
            code = warning.code.as_str(),
            key = warning.key.as_str(),
            cells = warning.cell_count,
            "{}",
            warning.message
        );
    }
}

/// Stores every warning it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<AreaWarning>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings received so far.
    pub fn warnings(&self) -> Vec<AreaWarning> {
        self.lock().clone()
    }

    /// Number of warnings received.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no warning was received.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take the warnings out, leaving the sink empty.
    pub fn drain(&self) -> Vec<AreaWarning> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AreaWarning>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, warning: &AreaWarning) {
        self.lock().push(warning.clone());
    }
}
