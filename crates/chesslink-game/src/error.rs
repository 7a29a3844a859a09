//! Error types for the game layer.

/// Errors from game-level operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A history lookup named a ply that hasn't been played.
    #[error("no ply {ply} in history of {len} moves")]
    NoSuchPly { ply: usize, len: usize },

    /// A ply index too large to put on the wire.
    #[error("ply index {0} out of range")]
    PlyOutOfRange(usize),
}
