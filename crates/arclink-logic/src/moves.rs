//! Moves and the player who plays them.
//!
//! A `Move` is one validated mutation of the board. `Player` applies moves
//! and keeps the session's score in a `PlayerState`.
//!
//! # Scoring
//!
//! - `moves` goes up on every successful push that lands somewhere other than
//!   the field the arc was pulled from. Pulls and put-backs are free.
//! - `won` is recomputed after every successful move: no arc in hand and the
//!   start node connected to the final node. It is therefore false whenever an
//!   arc is held.
//! - A win is credited when `won` becomes true on a board whose last stable
//!   state was unsolved: `win_count` goes up and `moves_best_score` takes
//!   `moves` if there is no score yet or it improves. Lifting an arc off a
//!   solved board and putting it back does not credit a second win.

use crate::arc::ArcId;
use crate::board::GameBoard;
use crate::error::MoveError;
use crate::geometry::Orientation;
use crate::grid::FieldKey;
use serde::{Deserialize, Serialize};

/// One detach-or-attach action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Take `arc` out of its field, dragging it toward `direction`.
    Pull { arc: ArcId, direction: Orientation },
    /// Place `arc` into `field`.
    Push { arc: ArcId, field: FieldKey },
}

impl Move {
    pub fn arc(&self) -> ArcId {
        match *self {
            Move::Pull { arc, .. } | Move::Push { arc, .. } => arc,
        }
    }

    /// Apply to the board. Rejected moves change nothing.
    pub fn apply(&self, board: &mut GameBoard) -> Result<(), MoveError> {
        match *self {
            Move::Pull { arc, .. } => board.pull(arc),
            Move::Push { arc, field } => {
                let target = board.grid().field(field).ok_or(MoveError::NoTarget {
                    at: field.origin,
                    orientation: field.orientation,
                })?;
                board.push(arc, &target)
            }
        }
    }
}

/// Per-session score counters, read back by persistence after play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub moves: u64,
    pub moves_best_score: u64,
    pub win_count: u64,
    pub won: bool,
}

/// Plays moves against a board and keeps score.
#[derive(Debug, Clone, Default)]
pub struct Player {
    state: PlayerState,
    /// The current solved streak has already been counted.
    credited: bool,
}

impl Player {
    pub fn new(state: PlayerState) -> Self {
        Self {
            credited: state.won,
            state,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.won
    }

    /// Record the board's current win status without counting a win.
    pub fn reset_win(&mut self, won: bool) {
        self.state.won = won;
        self.credited = won;
    }

    /// Validate and apply `mv`, then update the score.
    ///
    /// `holding` tells whether an arc is still in hand once this move is done;
    /// a win only counts on a stable board.
    pub fn play_move(
        &mut self,
        board: &mut GameBoard,
        mv: &Move,
        holding: bool,
    ) -> Result<(), MoveError> {
        let origin = board.arc(mv.arc()).and_then(|a| a.prev_field());
        mv.apply(board)?;

        if let Move::Push { field, .. } = *mv {
            if origin != Some(field) {
                self.state.moves += 1;
            }
        }
        self.update_win(board, holding);
        Ok(())
    }

    fn update_win(&mut self, board: &GameBoard, holding: bool) {
        let connected = match (board.start_node(), board.final_node()) {
            (Some(start), Some(end)) => board.is_connected(start, end),
            _ => false,
        };
        let won = !holding && connected;

        if !holding && !won {
            self.credited = false;
        }
        if won && !self.credited {
            self.credited = true;
            self.state.win_count += 1;
            if self.state.moves_best_score == 0 || self.state.moves < self.state.moves_best_score {
                self.state.moves_best_score = self.state.moves;
            }
            log::info!(
                "puzzle solved in {} moves (best {})",
                self.state.moves,
                self.state.moves_best_score
            );
        }
        self.state.won = won;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    /// (0,0) (1,0) (2,0) in a row, one arc on the right field.
    fn board() -> (GameBoard, ArcId) {
        let mut b = GameBoard::new();
        for x in 0..3 {
            b.place_node(p(x, 0)).unwrap();
        }
        let arc = b.create_arc(p(1, 0), Orientation::Right).unwrap();
        b.set_start_node(p(0, 0));
        b.set_final_node(p(1, 0));
        (b, arc)
    }

    fn key(b: &GameBoard, x: i32, y: i32, o: Orientation) -> FieldKey {
        b.field_at(p(x, y), o).unwrap().key()
    }

    #[test]
    fn test_pull_is_free() {
        let (mut b, arc) = board();
        let mut player = Player::default();
        let pull = Move::Pull {
            arc,
            direction: Orientation::Up,
        };
        player.play_move(&mut b, &pull, true).unwrap();
        assert_eq!(player.state().moves, 0);
        assert!(b.arc(arc).unwrap().is_pulled());
    }

    #[test]
    fn test_push_counts_and_wins() {
        let (mut b, arc) = board();
        let mut player = Player::default();
        let target = key(&b, 0, 0, Orientation::Right);

        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Left }, true)
            .unwrap();
        player
            .play_move(&mut b, &Move::Push { arc, field: target }, false)
            .unwrap();

        let s = player.state();
        assert_eq!(s.moves, 1);
        assert!(s.won);
        assert_eq!(s.win_count, 1);
        assert_eq!(s.moves_best_score, 1);
    }

    #[test]
    fn test_put_back_is_free() {
        let (mut b, arc) = board();
        let mut player = Player::default();
        let home = key(&b, 1, 0, Orientation::Right);
        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
            .unwrap();
        player
            .play_move(&mut b, &Move::Push { arc, field: home }, false)
            .unwrap();
        assert_eq!(player.state().moves, 0);
        assert!(!player.is_won());
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let (mut b, arc) = board();
        let mut player = Player::default();
        let field = key(&b, 1, 0, Orientation::Right);
        let err = player
            .play_move(&mut b, &Move::Push { arc, field }, false)
            .unwrap_err();
        assert!(err.is_invalid_placement());
        assert_eq!(*player.state(), PlayerState::default());
    }

    #[test]
    fn test_win_counts_once_per_transition() {
        let (mut b, arc) = board();
        let mut player = Player::new(PlayerState {
            moves_best_score: 5,
            ..PlayerState::default()
        });
        let win_field = key(&b, 0, 0, Orientation::Right);
        let away = key(&b, 1, 0, Orientation::Right);

        for target in [win_field, away, win_field] {
            player
                .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
                .unwrap();
            player
                .play_move(&mut b, &Move::Push { arc, field: target }, false)
                .unwrap();
        }
        let s = player.state();
        assert_eq!(s.moves, 3);
        assert_eq!(s.win_count, 2);
        // first win at 1 move beat the stored 5; the second at 3 does not
        assert_eq!(s.moves_best_score, 1);
    }

    #[test]
    fn test_pull_clears_won_and_put_back_is_not_a_new_win() {
        let (mut b, arc) = board();
        let mut player = Player::default();
        let win_field = key(&b, 0, 0, Orientation::Right);
        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
            .unwrap();
        player
            .play_move(&mut b, &Move::Push { arc, field: win_field }, false)
            .unwrap();
        assert!(player.is_won());

        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
            .unwrap();
        assert!(!player.is_won(), "nothing is won while an arc is held");

        player
            .play_move(&mut b, &Move::Push { arc, field: win_field }, false)
            .unwrap();
        let s = player.state();
        assert!(s.won);
        assert_eq!(s.win_count, 1);
        assert_eq!(s.moves, 1);
    }

    #[test]
    fn test_reset_win_false_allows_credit() {
        let (mut b, arc) = board();
        let mut player = Player::new(PlayerState {
            won: true,
            ..PlayerState::default()
        });
        player.reset_win(false);
        let target = key(&b, 0, 0, Orientation::Right);
        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
            .unwrap();
        player
            .play_move(&mut b, &Move::Push { arc, field: target }, false)
            .unwrap();
        assert_eq!(player.state().win_count, 1);
    }

    #[test]
    fn test_no_win_without_endpoints() {
        let (mut b, arc) = board();
        b.set_final_node(p(9, 9));
        let mut player = Player::default();
        let target = key(&b, 0, 0, Orientation::Right);
        player
            .play_move(&mut b, &Move::Pull { arc, direction: Orientation::Up }, true)
            .unwrap();
        player
            .play_move(&mut b, &Move::Push { arc, field: target }, false)
            .unwrap();
        assert!(!player.is_won());
    }
}
