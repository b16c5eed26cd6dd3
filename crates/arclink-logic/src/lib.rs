//! Pure board logic for ArcLink.
//!
//! A board of fixed nodes is joined by movable arcs. The player pulls an arc
//! out of one field and pushes it into another, trying to link the start node
//! to the final node through an unbroken chain of placed arcs.
//!
//! This crate contains all game logic that is independent of rendering, input
//! and storage. Functions take plain data and return results, so everything is
//! unit-testable and usable from any front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`geometry`] | Integer points and the four orientations |
//! | [`grid`] | Node placement, field resolution and occupancy |
//! | [`arc`] | Mobile edges of fixed length |
//! | [`island`] | Connected components under arc insertion and removal |
//! | [`board`] | Grid + arcs + islands; the push/pull primitives |
//! | [`moves`] | Move values, the player and its score counters |
//! | [`puzzle`] | Two-phase pull/push session and win detection |
//! | [`level`] | Serializable level data and board construction |
//! | [`error`] | Rejection reasons |
//!
//! ```
//! use arclink_logic::geometry::{Orientation, Point, PointDir};
//! use arclink_logic::level::Level;
//! use arclink_logic::puzzle::Puzzle;
//!
//! let mut level = Level::new(
//!     "Corner",
//!     vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)],
//!     vec![PointDir::new(Point::new(0, 0), Orientation::Up)],
//! );
//! level.final_node = Some(Point::new(1, 0));
//!
//! let mut puzzle = Puzzle::from_level(&level).unwrap();
//! puzzle.pull_arc_at(Point::new(0, 0), Orientation::Down).unwrap();
//! puzzle.push_arc_at(Point::new(0, 0), Orientation::Right).unwrap();
//! assert!(puzzle.is_won());
//! ```

pub mod arc;
pub mod board;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod island;
pub mod level;
pub mod moves;
pub mod puzzle;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::arc::{Arc, ArcId};
    pub use crate::board::GameBoard;
    pub use crate::error::MoveError;
    pub use crate::geometry::{Orientation, Point, PointDir};
    pub use crate::grid::{Field, FieldKey, Node, NodeId};
    pub use crate::island::{IslandId, IslandSet};
    pub use crate::level::{build_board, Level, LevelError};
    pub use crate::moves::{Move, Player, PlayerState};
    pub use crate::puzzle::{Phase, Puzzle};
}
