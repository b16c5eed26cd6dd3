//! Level data and board construction.
//!
//! A `Level` is the minimal description needed to rebuild a game state: node
//! positions, placed arcs, the start and final nodes and the player's stored
//! counters. It is plain serde data; reading and writing files is left to the
//! caller.
//!
//! ```
//! use arclink_logic::geometry::{Orientation, Point, PointDir};
//! use arclink_logic::level::{build_board, Level};
//!
//! let level = Level::new(
//!     "Row",
//!     vec![Point::new(0, 0), Point::new(1, 0)],
//!     vec![PointDir::new(Point::new(0, 0), Orientation::Right)],
//! );
//! let board = build_board(&level).unwrap();
//! assert!(board.is_connected_at(Point::new(0, 0), Point::new(1, 0)));
//! ```

use crate::board::GameBoard;
use crate::error::MoveError;
use crate::geometry::{Orientation, Point, PointDir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stored game state for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<Point>,
    #[serde(default)]
    pub arcs: Vec<PointDir>,
    /// Defaults to the first node.
    #[serde(default)]
    pub start_node: Option<Point>,
    /// Defaults to the last node.
    #[serde(default)]
    pub final_node: Option<Point>,
    /// Arc at the start node, facing away from this, begins in hand.
    #[serde(default)]
    pub start_pull: Orientation,
    #[serde(default)]
    pub moves: u64,
    #[serde(default)]
    pub moves_best_score: u64,
    #[serde(default)]
    pub time_elapsed: f64,
    #[serde(default)]
    pub win_count: u64,
    /// Scripted steps, alternating pull and push.
    #[serde(default)]
    pub tutorial: Option<Vec<PointDir>>,
}

impl Level {
    pub fn new(name: impl Into<String>, nodes: Vec<Point>, arcs: Vec<PointDir>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            nodes,
            arcs,
            start_node: None,
            final_node: None,
            start_pull: Orientation::None,
            moves: 0,
            moves_best_score: 0,
            time_elapsed: 0.0,
            win_count: 0,
            tutorial: None,
        }
    }

    pub fn resolved_start(&self) -> Option<Point> {
        self.start_node.or_else(|| self.nodes.first().copied())
    }

    pub fn resolved_final(&self) -> Option<Point> {
        self.final_node.or_else(|| self.nodes.last().copied())
    }
}

/// Why a level could not be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level has no nodes")]
    Empty,

    #[error("node {position}: {source}")]
    Node {
        position: Point,
        #[source]
        source: MoveError,
    },

    #[error("arc at {position} facing {direction}: {source}")]
    Arc {
        position: Point,
        direction: Orientation,
        #[source]
        source: MoveError,
    },

    #[error("start node {0} is not on the board")]
    MissingStart(Point),

    #[error("final node {0} is not on the board")]
    MissingFinal(Point),
}

/// Build a board from level data: nodes first, then arcs, then endpoints.
pub fn build_board(level: &Level) -> Result<GameBoard, LevelError> {
    if level.nodes.is_empty() {
        return Err(LevelError::Empty);
    }

    let mut board = GameBoard::new();
    for &position in &level.nodes {
        board
            .place_node(position)
            .map_err(|source| LevelError::Node { position, source })?;
    }
    for arc in &level.arcs {
        board
            .create_arc(arc.point, arc.direction)
            .map_err(|source| LevelError::Arc {
                position: arc.point,
                direction: arc.direction,
                source,
            })?;
    }

    let start = level.resolved_start().ok_or(LevelError::Empty)?;
    board
        .set_start_node(start)
        .ok_or(LevelError::MissingStart(start))?;
    let end = level.resolved_final().ok_or(LevelError::Empty)?;
    board
        .set_final_node(end)
        .ok_or(LevelError::MissingFinal(end))?;

    log::debug!(
        "built level '{}': {} nodes, {} arcs, size {}",
        level.name,
        level.nodes.len(),
        level.arcs.len(),
        board.size()
    );
    Ok(board)
}
