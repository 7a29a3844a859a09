//! The local copy of the game: latest snapshot plus the free-text fields
//! the server sends alongside it.

use chesslink_protocol::{Board, GameId, GameState, Move};
use serde::Serialize;

/// Status text before the server has said anything.
pub const DEFAULT_STATUS: &str = "Normal";

/// End-of-game label while the game is still running.
pub const GAME_CONTINUING: &str = "Continuing";

// ---------------------------------------------------------------------------
// GameStore
// ---------------------------------------------------------------------------

/// Holds the current [`GameState`] and the server's status fields.
///
/// The state is only ever replaced whole, never patched. A fresh store
/// shows the standard starting position with nobody to move.
#[derive(Debug, Clone)]
pub struct GameStore {
    state: GameState,
    status: String,
    game_end: Option<String>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self {
            state: GameState::default(),
            status: DEFAULT_STATUS.to_string(),
            game_end: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// `true` when the local side may move.
    pub fn turn(&self) -> bool {
        self.state.turn
    }

    /// Every ply played so far, oldest first.
    pub fn previous_moves(&self) -> &[Move] {
        &self.state.previous_moves
    }

    /// Swaps in a new snapshot wholesale.
    pub fn replace_state(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// The terminal description, or [`GAME_CONTINUING`] while unfinished.
    pub fn game_end(&self) -> &str {
        self.game_end.as_deref().unwrap_or(GAME_CONTINUING)
    }

    pub fn set_game_end(&mut self, description: impl Into<String>) {
        self.game_end = Some(description.into());
    }

    /// `true` once an end-of-game notice has arrived.
    pub fn is_over(&self) -> bool {
        self.game_end.is_some()
    }

    /// Builds the presentation summary.
    ///
    /// `connection` is the label of the channel's current status; the store
    /// doesn't track the channel itself.
    pub fn info(&self, game_id: &GameId, connection: impl Into<String>) -> GameInfo {
        GameInfo {
            game_id: game_id.clone(),
            connection: connection.into(),
            status: self.status.clone(),
            turn: self.state.turn,
            game_end: self.game_end().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// GameInfo
// ---------------------------------------------------------------------------

/// Everything a status panel shows about the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game_id: GameId,
    /// Connection status label, e.g. `Open`.
    pub connection: String,
    /// Latest informational text from the server.
    pub status: String,
    /// `true` when the local side may move.
    pub turn: bool,
    /// `Continuing`, or how the game ended.
    pub game_end: String,
}
