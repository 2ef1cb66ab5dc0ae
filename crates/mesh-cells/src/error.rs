//! Error types for cell mesh operations with rich diagnostics.
//!
//! Errors carry:
//! - Machine-readable error codes for programmatic handling
//! - Context (which group, which cell, which point)
//! - Recovery suggestions for common issues
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `CELL-XXXX`:
//! - `CELL-1xxx`: Reference-cell resolution (recoverable per group)
//! - `CELL-2xxx`: Structural errors (connectivity, coordinates, group layout)
//!
//! # Example
//!
//! ```
//! use mesh_cells::{CellError, ErrorCode};
//!
//! let err = CellError::invalid_point_index("triangle3", 1, 42, 10);
//! assert_eq!(err.code(), ErrorCode::InvalidPointIndex);
//! assert_eq!(err.code().as_str(), "CELL-2001");
//! assert!(err.is_structural());
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for cell mesh operations.
pub type CellResult<T> = Result<T, CellError>;

/// Machine-readable error codes for cell mesh operations.
///
/// Codes follow the pattern `CELL-XXXX` where:
/// - 1xxx = Reference-cell resolution
/// - 2xxx = Structural errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// CELL-1001: No reference cell registered for a cell type
    UnsupportedCellType = 1001,

    /// CELL-2001: Connectivity references a point outside the point table
    InvalidPointIndex = 2001,
    /// CELL-2002: Cell point count differs from its group's declared size
    CellSizeMismatch = 2002,
    /// CELL-2003: Reference cell expects a different number of points per cell
    ReferenceMismatch = 2003,
    /// CELL-2004: Reference cell returned the wrong number of areas
    AreaCountMismatch = 2004,
    /// CELL-2005: Point has a NaN or infinite coordinate
    InvalidCoordinate = 2005,
    /// CELL-2006: Cell type registered twice in the same mesh
    DuplicateCellType = 2006,
    /// CELL-2007: Group definition is unusable
    InvalidGroup = 2007,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `CELL-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedCellType => "CELL-1001",
            ErrorCode::InvalidPointIndex => "CELL-2001",
            ErrorCode::CellSizeMismatch => "CELL-2002",
            ErrorCode::ReferenceMismatch => "CELL-2003",
            ErrorCode::AreaCountMismatch => "CELL-2004",
            ErrorCode::InvalidCoordinate => "CELL-2005",
            ErrorCode::DuplicateCellType => "CELL-2006",
            ErrorCode::InvalidGroup => "CELL-2007",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for cell mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Register a reference cell for the given type key.
    RegisterReferenceCell { key: String },
    /// Check the upstream mesh import for the listed problems.
    CheckSourceMesh { checks: Vec<String> },
    /// The reference cell implementation does not honor its contract.
    FixReferenceCell { name: String },
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::RegisterReferenceCell { key } => {
                write!(
                    f,
                    "Register a reference cell for \"{}\" with ReferenceRegistry::register",
                    key
                )
            }
            RecoverySuggestion::CheckSourceMesh { checks } => {
                write!(f, "Check the source mesh for: {}", checks.join(", "))
            }
            RecoverySuggestion::FixReferenceCell { name } => {
                write!(
                    f,
                    "Reference cell {} must return exactly one area per cell",
                    name
                )
            }
        }
    }
}

/// Location information for cell mesh errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CellLocation {
    /// Error at a specific cell of a group.
    Cell { key: String, index: usize },
    /// Error at a specific point of the point table.
    Point { index: usize },
    /// Error affecting a whole group.
    Group { key: String },
}

impl std::fmt::Display for CellLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellLocation::Cell { key, index } => write!(f, "cell {} of \"{}\"", index, key),
            CellLocation::Point { index } => write!(f, "point {}", index),
            CellLocation::Group { key } => write!(f, "group \"{}\"", key),
        }
    }
}

/// Errors that can occur during cell mesh operations.
///
/// Only [`CellError::UnsupportedCellType`] is recoverable: area aggregation
/// degrades the affected group instead of returning it. Every other variant
/// describes a broken mesh and is returned to the caller unchanged.
#[derive(Debug, Error, Diagnostic)]
pub enum CellError {
    /// No reference cell is registered for a cell type.
    #[error("reference cell for \"{key}\" not found")]
    #[diagnostic(
        code(cell::reference::unsupported),
        help("Register a reference cell for this key, or accept missing areas for its cells.")
    )]
    UnsupportedCellType { key: String },

    /// Connectivity references a point that does not exist.
    #[error(
        "invalid point index: cell {cell_index} of \"{key}\" references point {point_index}, but mesh only has {point_count} points"
    )]
    #[diagnostic(
        code(cell::structure::point_index),
        help("The connectivity table and the point table are out of sync. Re-import the mesh.")
    )]
    InvalidPointIndex {
        key: String,
        cell_index: usize,
        point_index: u32,
        point_count: usize,
    },

    /// A cell has a different number of points than its group declares.
    #[error("cell {cell_index} of \"{key}\" has {actual} points, expected {expected}")]
    #[diagnostic(
        code(cell::structure::cell_size),
        help("Every cell in a group must list the same number of points.")
    )]
    CellSizeMismatch {
        key: String,
        cell_index: usize,
        expected: usize,
        actual: usize,
    },

    /// The reference cell for a group expects a different cell size.
    #[error(
        "reference cell {reference} expects {expected} points per cell, but \"{key}\" has {actual}"
    )]
    #[diagnostic(
        code(cell::structure::reference),
        help("The cell type key is bound to a reference cell of a different shape.")
    )]
    ReferenceMismatch {
        key: String,
        reference: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A reference cell produced a different number of areas than cells.
    #[error("reference cell {reference} returned {actual} areas for {expected} cells of \"{key}\"")]
    #[diagnostic(code(cell::structure::area_count))]
    AreaCountMismatch {
        key: String,
        reference: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A point coordinate is NaN or infinite.
    #[error("invalid coordinate at point {point_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(cell::structure::coordinate),
        help("Check for numerical issues in the source data.")
    )]
    InvalidCoordinate {
        point_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// The same cell type key was added twice.
    #[error("cell type \"{key}\" is defined more than once")]
    #[diagnostic(
        code(cell::structure::duplicate),
        help("Merge the connectivity of both groups into a single group.")
    )]
    DuplicateCellType { key: String },

    /// A group definition cannot describe any cell.
    #[error("invalid group \"{key}\": {details}")]
    #[diagnostic(code(cell::structure::group))]
    InvalidGroup { key: String, details: String },
}

impl CellError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CellError::UnsupportedCellType { .. } => ErrorCode::UnsupportedCellType,
            CellError::InvalidPointIndex { .. } => ErrorCode::InvalidPointIndex,
            CellError::CellSizeMismatch { .. } => ErrorCode::CellSizeMismatch,
            CellError::ReferenceMismatch { .. } => ErrorCode::ReferenceMismatch,
            CellError::AreaCountMismatch { .. } => ErrorCode::AreaCountMismatch,
            CellError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            CellError::DuplicateCellType { .. } => ErrorCode::DuplicateCellType,
            CellError::InvalidGroup { .. } => ErrorCode::InvalidGroup,
        }
    }

    /// Whether this error indicates a broken mesh rather than a missing
    /// reference cell.
    pub fn is_structural(&self) -> bool {
        !matches!(self, CellError::UnsupportedCellType { .. })
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            CellError::UnsupportedCellType { key } => {
                RecoverySuggestion::RegisterReferenceCell { key: key.clone() }
            }
            CellError::InvalidPointIndex { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["point numbering".into(), "connectivity export".into()],
            },
            CellError::CellSizeMismatch { .. } | CellError::InvalidGroup { .. } => {
                RecoverySuggestion::CheckSourceMesh {
                    checks: vec!["cell type of each element".into()],
                }
            }
            CellError::ReferenceMismatch { key, .. } => {
                RecoverySuggestion::RegisterReferenceCell { key: key.clone() }
            }
            CellError::AreaCountMismatch { reference, .. } => {
                RecoverySuggestion::FixReferenceCell {
                    name: (*reference).to_string(),
                }
            }
            CellError::InvalidCoordinate { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["coordinate values".into(), "export precision".into()],
            },
            CellError::DuplicateCellType { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["duplicate element blocks".into()],
            },
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<CellLocation> {
        match self {
            CellError::InvalidPointIndex {
                key, cell_index, ..
            }
            | CellError::CellSizeMismatch {
                key, cell_index, ..
            } => Some(CellLocation::Cell {
                key: key.clone(),
                index: *cell_index,
            }),
            CellError::InvalidCoordinate { point_index, .. } => Some(CellLocation::Point {
                index: *point_index,
            }),
            CellError::UnsupportedCellType { key }
            | CellError::ReferenceMismatch { key, .. }
            | CellError::AreaCountMismatch { key, .. }
            | CellError::DuplicateCellType { key }
            | CellError::InvalidGroup { key, .. } => Some(CellLocation::Group { key: key.clone() }),
        }
    }

    // Constructor helpers for common error patterns

    /// Create an UnsupportedCellType error.
    pub fn unsupported_cell_type(key: impl Into<String>) -> Self {
        CellError::UnsupportedCellType { key: key.into() }
    }

    /// Create an InvalidPointIndex error.
    pub fn invalid_point_index(
        key: impl Into<String>,
        cell_index: usize,
        point_index: u32,
        point_count: usize,
    ) -> Self {
        CellError::InvalidPointIndex {
            key: key.into(),
            cell_index,
            point_index,
            point_count,
        }
    }

    /// Create a CellSizeMismatch error.
    pub fn cell_size_mismatch(
        key: impl Into<String>,
        cell_index: usize,
        expected: usize,
        actual: usize,
    ) -> Self {
        CellError::CellSizeMismatch {
            key: key.into(),
            cell_index,
            expected,
            actual,
        }
    }

    /// Create an InvalidCoordinate error.
    pub fn invalid_coordinate(point_index: usize, coordinate: &'static str, value: f64) -> Self {
        CellError::InvalidCoordinate {
            point_index,
            coordinate,
            value,
        }
    }

    /// Create an InvalidGroup error.
    pub fn invalid_group(key: impl Into<String>, details: impl Into<String>) -> Self {
        CellError::InvalidGroup {
            key: key.into(),
            details: details.into(),
        }
    }
}
