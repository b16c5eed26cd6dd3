//! Per-session puzzle rules.
//!
//! A logical move takes two calls: `pull_arc` lifts an arc into hand, then
//! `push_arc` places it. The session is an explicit two-state machine:
//!
//! ```text
//!   Idle ──pull_arc──▶ Holding { arc, direction } ──push_arc──▶ Idle
//! ```
//!
//! At most one arc is ever in hand. The puzzle is won when nothing is held and
//! the start node shares an island with the final node.

use crate::arc::ArcId;
use crate::board::GameBoard;
use crate::error::MoveError;
use crate::geometry::{Orientation, Point, PointDir};
use crate::grid::Field;
use crate::level::{build_board, Level, LevelError};
use crate::moves::{Move, Player, PlayerState};

/// Whether an arc is currently in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Holding { arc: ArcId, direction: Orientation },
}

/// One play session over a single board.
#[derive(Debug, Clone)]
pub struct Puzzle {
    board: GameBoard,
    player: Player,
    phase: Phase,
    history: Vec<Move>,
    name: String,
    /// Level data this session was built from, if any.
    source: Option<Level>,
}

impl Puzzle {
    /// Start a session named `name` on an already built board.
    pub fn new(name: impl Into<String>, board: GameBoard) -> Self {
        let mut puzzle = Self::with_state(board, name.into(), None, PlayerState::default());
        puzzle.sync_win();
        puzzle
    }

    fn with_state(
        board: GameBoard,
        name: String,
        source: Option<Level>,
        state: PlayerState,
    ) -> Self {
        Self {
            board,
            player: Player::new(state),
            phase: Phase::Idle,
            history: Vec::new(),
            name,
            source,
        }
    }

    /// Align the player's win flag with the board once setup is done. A board
    /// that starts solved is not credited as a win.
    fn sync_win(&mut self) {
        let solved = self.is_won();
        self.player.reset_win(solved);
    }

    /// Build the board for `level` and restore its stored counters.
    ///
    /// A `start_pull` orientation lifts the arc at the start node into hand
    /// during setup; that pull is not a move and is not recorded.
    pub fn from_level(level: &Level) -> Result<Self, LevelError> {
        let board = build_board(level)?;
        let state = PlayerState {
            moves: level.moves,
            moves_best_score: level.moves_best_score,
            win_count: level.win_count,
            won: false,
        };
        let mut puzzle = Self::with_state(board, level.name.clone(), Some(level.clone()), state);

        if level.start_pull != Orientation::None {
            let start = level.resolved_start().ok_or(LevelError::Empty)?;
            let facing = level.start_pull.opposite();
            match puzzle.board.arc_at(start, facing) {
                Some(arc) => {
                    puzzle
                        .board
                        .pull(arc)
                        .map_err(|source| LevelError::Arc {
                            position: start,
                            direction: facing,
                            source,
                        })?;
                    puzzle.phase = Phase::Holding {
                        arc,
                        direction: level.start_pull,
                    };
                }
                None => log::warn!(
                    "level '{}': no arc at {} facing {} to start pulled",
                    level.name,
                    start,
                    facing
                ),
            }
        }
        puzzle.sync_win();
        Ok(puzzle)
    }

    // ── Moves ───────────────────────────────────────────────────────────

    /// Lift `arc` into hand, dragging it toward `direction`.
    pub fn pull_arc(&mut self, arc: ArcId, direction: Orientation) -> Result<(), MoveError> {
        if let Phase::Holding { .. } = self.phase {
            log::trace!("pull of arc #{} refused: already holding", arc.index());
            return Err(MoveError::AlreadyHolding);
        }
        if self.board.arc(arc).is_none() {
            return Err(MoveError::UnknownArc(arc.index()));
        }

        let mv = Move::Pull { arc, direction };
        self.play(mv, true)?;
        self.phase = Phase::Holding { arc, direction };
        Ok(())
    }

    /// Pull the arc attached to the node at `node` on the side opposite `direction`.
    pub fn pull_arc_at(&mut self, node: Point, direction: Orientation) -> Result<(), MoveError> {
        let facing = direction.opposite();
        let arc = self.board.arc_at(node, facing).ok_or(MoveError::NoTarget {
            at: node,
            orientation: facing,
        })?;
        self.pull_arc(arc, direction)
    }

    /// Place the arc in hand into `field`.
    pub fn push_arc(&mut self, field: &Field) -> Result<(), MoveError> {
        let Phase::Holding { arc, .. } = self.phase else {
            log::trace!("push into {} refused: nothing in hand", field);
            return Err(MoveError::NotHolding);
        };

        let mv = Move::Push {
            arc,
            field: field.key(),
        };
        self.play(mv, false)?;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Push the arc in hand into the field leaving `node` in `direction`.
    pub fn push_arc_at(&mut self, node: Point, direction: Orientation) -> Result<(), MoveError> {
        let field = self
            .board
            .field_at(node, direction)
            .ok_or(MoveError::NoTarget {
                at: node,
                orientation: direction,
            })?;
        self.push_arc(&field)
    }

    fn play(&mut self, mv: Move, holding: bool) -> Result<(), MoveError> {
        match self.player.play_move(&mut self.board, &mv, holding) {
            Ok(()) => {
                self.history.push(mv);
                Ok(())
            }
            Err(err) => {
                log::trace!("{:?} refused: {}", mv, err);
                Err(err)
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Nothing in hand and start connected to final.
    pub fn is_won(&self) -> bool {
        if self.is_holding() {
            return false;
        }
        match (self.board.start_node(), self.board.final_node()) {
            (Some(start), Some(end)) => self.board.is_connected(start, end),
            _ => false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.phase, Phase::Holding { .. })
    }

    pub fn held_arc(&self) -> Option<ArcId> {
        match self.phase {
            Phase::Holding { arc, .. } => Some(arc),
            Phase::Idle => None,
        }
    }

    /// Direction the held arc was pulled toward (`None` when idle).
    pub fn pulled_direction(&self) -> Orientation {
        match self.phase {
            Phase::Holding { direction, .. } => direction,
            Phase::Idle => Orientation::None,
        }
    }

    /// Fields the held arc may be pushed into.
    pub fn push_targets(&self) -> Vec<Field> {
        self.held_arc()
            .map(|arc| self.board.push_targets(arc))
            .unwrap_or_default()
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn board_size(&self) -> Point {
        self.board.size()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn player_state(&self) -> &PlayerState {
        self.player.state()
    }

    pub fn moves(&self) -> u64 {
        self.player.state().moves
    }

    pub fn moves_best_score(&self) -> u64 {
        self.player.state().moves_best_score
    }

    pub fn win_count(&self) -> u64 {
        self.player.state().win_count
    }

    pub fn level_name(&self) -> &str {
        &self.name
    }

    /// Snapshot the session as level data for persistence.
    ///
    /// A held arc is written back at the field it was pulled from, so the
    /// snapshot always describes a stable board.
    pub fn to_level(&self) -> Level {
        let grid = self.board.grid();
        let nodes = grid.nodes().map(|n| n.position()).collect();

        let mut arcs: Vec<PointDir> = self
            .board
            .live_arcs()
            .filter_map(|a| a.field())
            .map(|k| PointDir::new(k.origin, k.orientation))
            .collect();
        if let Some(key) = self
            .held_arc()
            .and_then(|arc| self.board.arc(arc))
            .and_then(|a| a.prev_field())
        {
            arcs.push(PointDir::new(key.origin, key.orientation));
        }

        let state = self.player.state();
        let source = self.source.as_ref();
        Level {
            name: self.name.clone(),
            description: source.map(|l| l.description.clone()).unwrap_or_default(),
            nodes,
            arcs,
            start_node: self.board.start_node().and_then(|n| grid.position(n)),
            final_node: self.board.final_node().and_then(|n| grid.position(n)),
            start_pull: Orientation::None,
            moves: state.moves,
            moves_best_score: state.moves_best_score,
            time_elapsed: source.map_or(0.0, |l| l.time_elapsed),
            win_count: state.win_count,
            tutorial: source.and_then(|l| l.tutorial.clone()),
        }
    }
}
