//! Mobile edges.
//!
//! An `Arc` has a fixed length and no position of its own: where it sits is
//! whichever field currently holds it, or nowhere when pulled.

use crate::grid::{Field, FieldKey, Grid};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Arena index of an arc on its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(pub(crate) usize);

impl ArcId {
    /// Handle for the `index`-th arc created on a board. Handles that do not
    /// exist are refused with `MoveError::UnknownArc`.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A mobile edge of fixed length.
///
/// Equality is positional: two arcs are equal when both are pulled, or when
/// both occupy the same field. Two different pulled arcs therefore compare
/// equal; use `id()` when instance identity matters.
#[derive(Debug, Clone)]
pub struct Arc {
    id: ArcId,
    length: i32,
    field: Option<FieldKey>,
    prev_field: Option<FieldKey>,
}

impl Arc {
    pub(crate) fn new(id: ArcId, length: i32) -> Self {
        Self {
            id,
            length,
            field: None,
            prev_field: None,
        }
    }

    pub fn id(&self) -> ArcId {
        self.id
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    /// The field this arc occupies, if pushed.
    pub fn field(&self) -> Option<FieldKey> {
        self.field
    }

    /// The field this arc was last pulled from.
    pub fn prev_field(&self) -> Option<FieldKey> {
        self.prev_field
    }

    pub fn is_pulled(&self) -> bool {
        self.field.is_none()
    }

    /// Occupy `field`, leaving any field held before.
    ///
    /// Purely structural: connectivity is updated by the board.
    pub(crate) fn push(&mut self, grid: &mut Grid, field: &Field) {
        self.pull(grid);
        self.field = Some(field.key());
        grid.connect_arc(field.key(), self.id);
    }

    /// Leave the current field, remembering it as `prev_field`.
    pub(crate) fn pull(&mut self, grid: &mut Grid) {
        if let Some(key) = self.field.take() {
            grid.disconnect_arc(key, self.id);
            self.prev_field = Some(key);
        }
    }
}

impl PartialEq for Arc {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
    }
}

impl Eq for Arc {}

impl Hash for Arc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
    }
}

impl fmt::Display for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(key) => write!(f, "{} [{}]", key, self.length),
            None => write!(f, "PULLED [{}]", self.length),
        }
    }
}
