//! # Chesslink
//!
//! Client for keeping a chess board in sync with a remote authoritative
//! peer.
//!
//! The server owns the rules. It pushes full snapshots of the game (board,
//! whose turn, legal moves, history) over a WebSocket; the client draws
//! them, turns two clicks into one of the listed legal moves, and sends it
//! back. [`GameClient`] ties the layers together:
//!
//! ```text
//! chesslink-transport  bytes on a socket
//! chesslink-protocol   JSON shapes, board invariants
//! chesslink-session    one channel, its status, reconnect with backoff
//! chesslink-game       store, dispatcher, selection, history
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chesslink::prelude::*;
//!
//! # async fn demo() -> Result<(), ChesslinkError> {
//! chesslink::init_tracing("info");
//!
//! let mut client = GameClient::builder()
//!     .host("localhost:3000")
//!     .connect(WebSocketConnector, GameId::new("abc"));
//!
//! while let Some(_event) = client.next_event().await {
//!     if client.status().is_open() {
//!         client.click(Square::new(52)?).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod locator;

pub use client::{ClientEvent, GameClient, GameClientBuilder};
pub use error::ChesslinkError;
pub use locator::{FixedGame, GameLocator};

pub use chesslink_game::{
    Applied, ClickOutcome, GameInfo, GameStore, HistoryTurn, Orientation, PlyEntry, RejectReason,
    Selection, SelectionMachine,
};
pub use chesslink_protocol::{Board, GameId, GameState, Move, Piece, PieceKind, Side, Square};
pub use chesslink_session::{ConnectionStatus, ReconnectConfig, SessionConfig};
pub use chesslink_transport::WebSocketConnector;

/// Installs a `tracing` subscriber that prints to stderr.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `default_directive` (e.g. `"info"` or `"chesslink=debug"`). Calling it
/// twice is harmless; the second call leaves the first subscriber in place.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub mod prelude {
    //! Everything needed to join a game and play it.

    pub use crate::{
        ChesslinkError, ClickOutcome, ClientEvent, ConnectionStatus, FixedGame, GameClient,
        GameId, GameLocator, Orientation, Square, WebSocketConnector,
    };
}
