//! Messages exchanged with the game server.
//!
//! Two directions, two vocabularies:
//!
//! - **Inbound** ([`InboundMessage`]) — the server pushes full state
//!   snapshots, end-of-game notices, and free-text status updates, each
//!   tagged with a numeric `messageType` discriminant.
//! - **Outbound** ([`ClientMessage`]) — the client sends either a [`Move`]
//!   it wants to play or a [`MoveSearch`] query about the history log.
//!
//! Field names on the wire are camelCase (`oldSquare`, `possibleMoves`),
//! which `#[serde(rename_all = "camelCase")]` takes care of.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Board, ProtocolError, Square};

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// Opaque identifier of a match, handed out by matchmaking and used in the
/// channel URL (`/game/<id>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move from one square to another.
///
/// `move_type` is a free-form tag chosen by the server (`"normal"`,
/// `"capture"`, `"castle"`, a promotion marker, ...). The client never
/// interprets it; it only echoes back a move the server listed as legal.
///
/// Origin and destination always differ. Both [`Move::new`] and
/// deserialization enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MoveRepr")]
pub struct Move {
    move_type: String,
    old_square: Square,
    new_square: Square,
}

impl Move {
    /// Creates a move.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if `from == to`.
    pub fn new(
        move_type: impl Into<String>,
        from: Square,
        to: Square,
    ) -> Result<Self, ProtocolError> {
        if from == to {
            return Err(ProtocolError::InvalidMessage(format!(
                "move origin and destination are both {from}"
            )));
        }
        Ok(Self {
            move_type: move_type.into(),
            old_square: from,
            new_square: to,
        })
    }

    pub fn move_type(&self) -> &str {
        &self.move_type
    }

    /// Origin square.
    pub fn origin(&self) -> Square {
        self.old_square
    }

    /// Destination square.
    pub fn destination(&self) -> Square {
        self.new_square
    }

    /// `true` if this move goes from `from` to `to`.
    pub fn connects(&self, from: Square, to: Square) -> bool {
        self.old_square == from && self.new_square == to
    }
}

/// Renders as `old-new`, e.g. `52-36`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.old_square, self.new_square)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveRepr {
    #[serde(default)]
    move_type: String,
    old_square: Square,
    new_square: Square,
}

impl TryFrom<MoveRepr> for Move {
    type Error = ProtocolError;

    fn try_from(repr: MoveRepr) -> Result<Self, Self::Error> {
        Move::new(repr.move_type, repr.old_square, repr.new_square)
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The authoritative match snapshot sent by the server.
///
/// `possible_moves` is the complete set of legal moves for the side to
/// move; the client never computes legality itself. `previous_moves` is the
/// ply log, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GameStateRepr")]
pub struct GameState {
    /// `true` when the local side may move.
    pub turn: bool,
    pub board: Board,
    pub possible_moves: Vec<Move>,
    pub previous_moves: Vec<Move>,
}

impl GameState {
    /// The legal move from `from` to `to`, if the server listed one.
    pub fn find_move(&self, from: Square, to: Square) -> Option<&Move> {
        self.possible_moves.iter().find(|m| m.connects(from, to))
    }
}

/// Standard starting position, nobody to move, no moves known yet.
impl Default for GameState {
    fn default() -> Self {
        Self {
            turn: false,
            board: Board::standard(),
            possible_moves: Vec::new(),
            previous_moves: Vec::new(),
        }
    }
}

/// Loose wire shape of a game state.
///
/// The server marshals move lists as `null` when they're empty, and it
/// attaches a (possibly zero-valued) state to every message type. Decoding
/// into this shape never validates the board, so end-of-game and status
/// messages aren't rejected because of a placeholder state they carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStateRepr {
    #[serde(default)]
    turn: bool,
    #[serde(default)]
    board: Option<Vec<i8>>,
    #[serde(default)]
    possible_moves: Option<Vec<Move>>,
    #[serde(default)]
    previous_moves: Option<Vec<Move>>,
}

impl TryFrom<GameStateRepr> for GameState {
    type Error = ProtocolError;

    fn try_from(repr: GameStateRepr) -> Result<Self, Self::Error> {
        let board = repr
            .board
            .ok_or_else(|| ProtocolError::InvalidBoard("board is missing".into()))?;
        Ok(Self {
            turn: repr.turn,
            board: Board::try_from(board)?,
            possible_moves: repr.possible_moves.unwrap_or_default(),
            previous_moves: repr.previous_moves.unwrap_or_default(),
        })
    }
}

impl From<GameState> for GameStateRepr {
    fn from(state: GameState) -> Self {
        Self {
            turn: state.turn,
            board: Some(state.board.into()),
            possible_moves: Some(state.possible_moves),
            previous_moves: Some(state.previous_moves),
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// The `messageType` discriminant of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// 0 — full game state snapshot.
    StateSnapshot,
    /// 1 — the game is over; content describes how.
    GameEnd,
    /// 2 — informational status text.
    Status,
}

impl MessageType {
    /// Maps a wire discriminant to a message type.
    pub fn from_discriminant(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::StateSnapshot),
            1 => Some(Self::GameEnd),
            2 => Some(Self::Status),
            _ => None,
        }
    }

    /// The wire discriminant.
    pub fn discriminant(self) -> i64 {
        match self {
            Self::StateSnapshot => 0,
            Self::GameEnd => 1,
            Self::Status => 2,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateSnapshot => write!(f, "StateSnapshot"),
            Self::GameEnd => write!(f, "GameEnd"),
            Self::Status => write!(f, "Status"),
        }
    }
}

/// A decoded server → client message.
///
/// On the wire this is always the same flat object:
///
/// ```json
/// { "messageType": 0, "messageContent": "...", "gameState": { ... } }
/// ```
///
/// Decoding picks the variant from `messageType`. A type-0 message without
/// a valid `gameState` is rejected; for the other types `gameState` is
/// ignored. An unknown `messageType` fails with
/// [`ProtocolError::UnknownMessageType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InboundEnvelope", into = "InboundEnvelope")]
pub enum InboundMessage {
    /// Replace the whole local game state with `state`.
    StateSnapshot { content: String, state: GameState },
    /// The game ended; `content` is the terminal description.
    GameEnd { content: String },
    /// Free-text status from the server.
    Status { content: String },
}

impl InboundMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::StateSnapshot { .. } => MessageType::StateSnapshot,
            Self::GameEnd { .. } => MessageType::GameEnd,
            Self::Status { .. } => MessageType::Status,
        }
    }

    /// Convenience constructor for a snapshot with empty content.
    pub fn snapshot(state: GameState) -> Self {
        Self::StateSnapshot {
            content: String::new(),
            state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundEnvelope {
    message_type: i64,
    #[serde(default)]
    message_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    game_state: Option<GameStateRepr>,
}

impl TryFrom<InboundEnvelope> for InboundMessage {
    type Error = ProtocolError;

    fn try_from(env: InboundEnvelope) -> Result<Self, Self::Error> {
        let kind = MessageType::from_discriminant(env.message_type)
            .ok_or(ProtocolError::UnknownMessageType(env.message_type))?;
        let content = env.message_content;
        Ok(match kind {
            MessageType::StateSnapshot => {
                let repr = env.game_state.ok_or_else(|| {
                    ProtocolError::InvalidMessage("snapshot without gameState".into())
                })?;
                Self::StateSnapshot {
                    content,
                    state: GameState::try_from(repr)?,
                }
            }
            MessageType::GameEnd => Self::GameEnd { content },
            MessageType::Status => Self::Status { content },
        })
    }
}

impl From<InboundMessage> for InboundEnvelope {
    fn from(msg: InboundMessage) -> Self {
        let message_type = msg.message_type().discriminant();
        let (message_content, game_state) = match msg {
            InboundMessage::StateSnapshot { content, state } => (content, Some(state.into())),
            InboundMessage::GameEnd { content } | InboundMessage::Status { content } => {
                (content, None)
            }
        };
        Self {
            message_type,
            message_content,
            game_state,
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// Asks the server about one entry of the move history.
///
/// `index` is the ply's position in `previousMoves`. The server answers by
/// replaying the position after that ply in a regular snapshot; the client
/// doesn't change anything locally when sending it.
///
/// Serialized with the fixed discriminant: `{ "messageType": 0, "index": 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoveSearchRepr", into = "MoveSearchRepr")]
pub struct MoveSearch {
    pub index: u32,
}

impl MoveSearch {
    /// The fixed `messageType` of a move-search query.
    pub const DISCRIMINANT: i64 = 0;

    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveSearchRepr {
    message_type: i64,
    index: u32,
}

impl TryFrom<MoveSearchRepr> for MoveSearch {
    type Error = ProtocolError;

    fn try_from(repr: MoveSearchRepr) -> Result<Self, Self::Error> {
        if repr.message_type != MoveSearch::DISCRIMINANT {
            return Err(ProtocolError::UnknownMessageType(repr.message_type));
        }
        Ok(Self { index: repr.index })
    }
}

impl From<MoveSearch> for MoveSearchRepr {
    fn from(search: MoveSearch) -> Self {
        Self {
            message_type: MoveSearch::DISCRIMINANT,
            index: search.index,
        }
    }
}

/// A client → server message.
///
/// `#[serde(untagged)]` serializes each variant as its bare shape; the
/// server tells them apart by their fields (`oldSquare` vs `messageType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    /// Play this move.
    Move(Move),
    /// Query the history log.
    MoveSearch(MoveSearch),
}

impl From<Move> for ClientMessage {
    fn from(mv: Move) -> Self {
        Self::Move(mv)
    }
}

impl From<MoveSearch> for ClientMessage {
    fn from(search: MoveSearch) -> Self {
        Self::MoveSearch(search)
    }
}

// =========================================================================
// Tests
// =========================================================================
