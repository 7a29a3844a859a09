//! Error types for the protocol layer.
//!
//! Every way a message can fail to become a well-formed Rust value ends up
//! here: bad JSON, an unknown discriminant, a board of the wrong size, a
//! square index off the edge of the board.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, or a field
    /// whose value breaks one of the invariants below (serde surfaces
    /// `try_from` failures as decode errors).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The `messageType` discriminant is not one we know how to interpret.
    #[error("unknown message type {0}")]
    UnknownMessageType(i64),

    /// A square index outside `0..64`.
    #[error("square index {0} is off the board")]
    InvalidSquare(i64),

    /// A board that is not exactly 64 values in `-6..=6`.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    /// The message decoded but violates a protocol rule, e.g. a move whose
    /// origin equals its destination or a snapshot without a game state.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
