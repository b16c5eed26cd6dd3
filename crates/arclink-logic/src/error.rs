//! Rejection reasons for board and puzzle operations.
//!
//! Every rejection is silent and side-effect free: the board is untouched and
//! the caller simply re-prompts the player.

use crate::geometry::{Orientation, Point};
use crate::grid::FieldKey;
use thiserror::Error;

/// Why a move (or a board-building placement) was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The target field already holds an arc.
    #[error("field {0} is already occupied")]
    FieldOccupied(FieldKey),

    /// The arc's length does not match the field's length.
    #[error("arc of length {arc} does not fit field of length {field}")]
    LengthMismatch { arc: i32, field: i32 },

    /// The arc is not placed in any field.
    #[error("arc is already pulled")]
    AlreadyPulled,

    /// No node, field or arc resolves at the given position and direction.
    #[error("nothing at {at} facing {orientation}")]
    NoTarget { at: Point, orientation: Orientation },

    /// The arc handle does not belong to this board.
    #[error("unknown arc #{0}")]
    UnknownArc(usize),

    /// Pull requested while an arc is already in hand.
    #[error("an arc is already in hand")]
    AlreadyHolding,

    /// Push requested with nothing in hand.
    #[error("no arc in hand")]
    NotHolding,

    /// A node already sits at this position.
    #[error("a node already occupies {0}")]
    NodeOccupied(Point),

    /// Placing a node here would cut an occupied field in two.
    #[error("a node at {0} would split an occupied field")]
    SplitsField(Point),

    /// A coordinate lies outside `±Grid::COORD_LIMIT`.
    #[error("{0} is outside the playable range")]
    OutOfRange(Point),
}

impl MoveError {
    /// True for the two invalid-placement rejections (occupied or wrong length).
    pub fn is_invalid_placement(&self) -> bool {
        matches!(
            self,
            MoveError::FieldOccupied(_) | MoveError::LengthMismatch { .. }
        )
    }

    /// True for rejections caused by the pull/push phase rather than the board.
    pub fn is_wrong_phase(&self) -> bool {
        matches!(self, MoveError::AlreadyHolding | MoveError::NotHolding)
    }
}
