//! Wire protocol for Chesslink.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Board types** ([`Square`], [`Board`], [`Piece`]) — the 64-square
//!   board with its invariants enforced at construction and decode time.
//! - **Messages** ([`InboundMessage`], [`ClientMessage`], [`Move`],
//!   [`MoveSearch`], [`GameState`]) — the JSON shapes on the channel.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (InboundMessage) → Session → Game store
//! ```

mod board;
mod codec;
mod error;
mod message;

pub use board::{Board, Piece, PieceKind, Side, Square};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    ClientMessage, GameId, GameState, InboundMessage, MessageType, Move, MoveSearch,
};
