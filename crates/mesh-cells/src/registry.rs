//! Registry binding cell type keys to reference cells.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{CellError, CellResult};
use crate::reference::{Quad4, Quad9, ReferenceCell, Triangle3, Triangle6};
use crate::types::{CellTypeKey, keys};

/// Outcome of resolving a cell type key.
///
/// Lookup failure is an expected state (unregistered or unsupported shape),
/// so it is a variant rather than an error.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    /// A reference cell is registered for the key.
    Resolved(&'a dyn ReferenceCell),
    /// No reference cell is registered for the key.
    Unsupported(&'a str),
}

impl<'a> Resolution<'a> {
    /// The resolved reference cell, if any.
    pub fn reference(&self) -> Option<&'a dyn ReferenceCell> {
        match self {
            Resolution::Resolved(cell) => Some(*cell),
            Resolution::Unsupported(_) => None,
        }
    }

    /// Whether the key was resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Mapping from cell type key to reference cell.
///
/// Populated while the mesh is built and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRegistry {
    cells: HashMap<CellTypeKey, Arc<dyn ReferenceCell>>,
}

impl ReferenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in reference cells:
    /// `triangle3`, `triangle6`, `quad4` and `quad9`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(keys::TRIANGLE3, Arc::new(Triangle3));
        registry.register(keys::TRIANGLE6, Arc::new(Triangle6));
        registry.register(keys::QUAD4, Arc::new(Quad4));
        registry.register(keys::QUAD9, Arc::new(Quad9));
        registry
    }

    /// Bind `key` to `cell`, returning the previous binding if any.
    pub fn register(
        &mut self,
        key: impl Into<CellTypeKey>,
        cell: Arc<dyn ReferenceCell>,
    ) -> Option<Arc<dyn ReferenceCell>> {
        self.cells.insert(key.into(), cell)
    }

    /// Remove the binding for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Arc<dyn ReferenceCell>> {
        self.cells.remove(key)
    }

    /// Look up the reference cell for `key`.
    ///
    /// Fails with [`CellError::UnsupportedCellType`] when nothing is registered.
    pub fn lookup(&self, key: &str) -> CellResult<&dyn ReferenceCell> {
        self.cells
            .get(key)
            .map(|cell| cell.as_ref())
            .ok_or_else(|| CellError::unsupported_cell_type(key))
    }

    /// Resolve `key` into a [`Resolution`].
    pub fn resolve<'a>(&'a self, key: &'a str) -> Resolution<'a> {
        match self.cells.get(key) {
            Some(cell) => Resolution::Resolved(cell.as_ref()),
            None => Resolution::Unsupported(key),
        }
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &CellTypeKey> + '_ {
        self.cells.keys()
    }

    /// Number of registered reference cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
