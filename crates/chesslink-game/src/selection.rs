//! Two-click move entry.
//!
//! The first click picks up a piece, the second names where it goes:
//!
//! ```text
//!            click occupied square          click same square
//!   Idle ──────────────────────────→ Selected(a) ───────────────→ Idle
//!    ↑                                    │
//!    └────── click any other square ──────┘  (emits a move if legal
//!                                              and it's our turn)
//! ```
//!
//! Legality is never computed here. The server lists the legal moves in
//! every snapshot and the machine only looks them up.

use std::fmt;

use chesslink_protocol::{GameState, Move, Square};
use tracing::debug;

/// Current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(Square),
}

/// Why a second click didn't produce a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The server says it's the other side's turn.
    NotYourTurn,
    /// No legal move connects the two squares.
    IllegalMove,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYourTurn => write!(f, "not your turn"),
            Self::IllegalMove => write!(f, "illegal move"),
        }
    }
}

/// Result of one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A piece was picked up.
    Selected(Square),
    /// The selected square was clicked again.
    Deselected,
    /// An empty square was clicked with nothing selected.
    Ignored,
    /// The click completed a legal move; send it.
    MoveEmitted(Move),
    /// The click completed a move that can't be played.
    Rejected {
        from: Square,
        to: Square,
        reason: RejectReason,
    },
}

/// The selection state machine.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        match self.selection {
            Selection::Idle => None,
            Selection::Selected(square) => Some(square),
        }
    }

    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Handles a click on canonical square `square`.
    pub fn click(&mut self, square: Square, state: &GameState) -> ClickOutcome {
        match self.selection {
            Selection::Idle => {
                if state.board.is_empty_at(square) {
                    return ClickOutcome::Ignored;
                }
                self.selection = Selection::Selected(square);
                ClickOutcome::Selected(square)
            }
            Selection::Selected(from) if from == square => {
                self.selection = Selection::Idle;
                ClickOutcome::Deselected
            }
            Selection::Selected(from) => {
                self.selection = Selection::Idle;
                let reason = if !state.turn {
                    RejectReason::NotYourTurn
                } else if let Some(mv) = state.find_move(from, square) {
                    return ClickOutcome::MoveEmitted(mv.clone());
                } else {
                    RejectReason::IllegalMove
                };
                debug!(%from, to = %square, %reason, "move rejected");
                ClickOutcome::Rejected {
                    from,
                    to: square,
                    reason,
                }
            }
        }
    }

    /// Destinations of the legal moves from the selected square.
    pub fn targets<'a>(&self, state: &'a GameState) -> impl Iterator<Item = Square> + 'a {
        let from = self.selected();
        state
            .possible_moves
            .iter()
            .filter(move |m| Some(m.origin()) == from)
            .map(Move::destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chesslink_protocol::Board;

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    fn state(turn: bool) -> GameState {
        GameState {
            turn,
            board: Board::standard(),
            possible_moves: vec![
                Move::new("Normal", sq(52), sq(36)).unwrap(),
                Move::new("Normal", sq(52), sq(44)).unwrap(),
            ],
            previous_moves: Vec::new(),
        }
    }

    #[test]
    fn test_click_empty_square_while_idle_is_ignored() {
        let mut machine = SelectionMachine::new();
        assert_eq!(machine.click(sq(36), &state(true)), ClickOutcome::Ignored);
        assert_eq!(machine.selection(), Selection::Idle);
    }

    #[test]
    fn test_click_piece_selects_it() {
        let mut machine = SelectionMachine::new();
        assert_eq!(machine.click(sq(52), &state(true)), ClickOutcome::Selected(sq(52)));
        assert_eq!(machine.selected(), Some(sq(52)));
    }

    #[test]
    fn test_opponent_piece_can_be_selected() {
        let mut machine = SelectionMachine::new();
        assert_eq!(machine.click(sq(12), &state(true)), ClickOutcome::Selected(sq(12)));
    }

    #[test]
    fn test_click_selected_square_deselects() {
        let mut machine = SelectionMachine::new();
        machine.click(sq(52), &state(true));
        assert_eq!(machine.click(sq(52), &state(true)), ClickOutcome::Deselected);
        assert_eq!(machine.selection(), Selection::Idle);
    }

    #[test]
    fn test_legal_move_is_emitted() {
        let mut machine = SelectionMachine::new();
        let state = state(true);
        machine.click(sq(52), &state);
        assert_eq!(
            machine.click(sq(36), &state),
            ClickOutcome::MoveEmitted(Move::new("Normal", sq(52), sq(36)).unwrap())
        );
        assert_eq!(machine.selection(), Selection::Idle);
    }

    #[test]
    fn test_illegal_destination_is_rejected() {
        let mut machine = SelectionMachine::new();
        let state = state(true);
        machine.click(sq(52), &state);
        assert_eq!(
            machine.click(sq(20), &state),
            ClickOutcome::Rejected {
                from: sq(52),
                to: sq(20),
                reason: RejectReason::IllegalMove,
            }
        );
        assert_eq!(machine.selection(), Selection::Idle);
    }

    #[test]
    fn test_out_of_turn_is_rejected_even_if_listed() {
        let mut machine = SelectionMachine::new();
        let state = state(false);
        machine.click(sq(52), &state);
        assert_eq!(
            machine.click(sq(36), &state),
            ClickOutcome::Rejected {
                from: sq(52),
                to: sq(36),
                reason: RejectReason::NotYourTurn,
            }
        );
    }

    #[test]
    fn test_second_click_on_other_piece_does_not_reselect() {
        let mut machine = SelectionMachine::new();
        let state = state(true);
        machine.click(sq(52), &state);
        assert!(matches!(
            machine.click(sq(51), &state),
            ClickOutcome::Rejected { .. }
        ));
        assert_eq!(machine.selection(), Selection::Idle);
    }

    #[test]
    fn test_targets_follow_selection() {
        let mut machine = SelectionMachine::new();
        let state = state(true);
        assert_eq!(machine.targets(&state).count(), 0);
        machine.click(sq(52), &state);
        let targets: Vec<_> = machine.targets(&state).collect();
        assert_eq!(targets, vec![sq(36), sq(44)]);
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::NotYourTurn.to_string(), "not your turn");
        assert_eq!(RejectReason::IllegalMove.to_string(), "illegal move");
    }
}
