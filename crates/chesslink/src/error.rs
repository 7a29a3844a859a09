//! Unified error type for Chesslink.

use chesslink_game::GameError;
use chesslink_protocol::ProtocolError;
use chesslink_session::SessionError;
use chesslink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` conversions let `?` lift any sub-crate error into this
/// one.
#[derive(Debug, thiserror::Error)]
pub enum ChesslinkError {
    /// A transport-level error (dial, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (not ready, task gone).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A game-level error (unknown history ply).
    #[error(transparent)]
    Game(#[from] GameError),
}
