//! Applies decoded inbound messages to the store.

use chesslink_protocol::InboundMessage;
use tracing::{debug, info};

use crate::GameStore;

/// What an inbound message changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The whole game state was replaced by a snapshot.
    StateReplaced,
    /// The end-of-game label was set.
    GameEnded,
    /// The informational status text was set.
    StatusUpdated,
}

/// Applies one inbound message to `store`.
///
/// Snapshots replace the state wholesale. End-of-game and status notices
/// only touch their text field; board, turn, and moves stay as they were.
pub fn apply(message: InboundMessage, store: &mut GameStore) -> Applied {
    match message {
        InboundMessage::StateSnapshot { state, .. } => {
            debug!(
                turn = state.turn,
                legal = state.possible_moves.len(),
                plies = state.previous_moves.len(),
                "snapshot applied"
            );
            store.replace_state(state);
            Applied::StateReplaced
        }
        InboundMessage::GameEnd { content } => {
            info!(result = %content, "game ended");
            store.set_game_end(content);
            Applied::GameEnded
        }
        InboundMessage::Status { content } => {
            debug!(status = %content, "status updated");
            store.set_status(content);
            Applied::StatusUpdated
        }
    }
}
