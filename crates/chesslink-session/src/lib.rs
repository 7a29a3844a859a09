//! Connection lifecycle for Chesslink.
//!
//! This crate owns the channel to the game server:
//!
//! 1. **Dialing**: one background task per channel ([`ConnectionManager`]).
//! 2. **Status**: a single observable [`ConnectionStatus`] per channel.
//! 3. **Message streams**: decoded inbound messages in arrival order, and
//!    outbound sends that are refused unless the channel is open.
//! 4. **Reconnection**: bounded exponential backoff ([`ReconnectConfig`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Game layer (above)  ← applies inbound messages, produces moves
//!     ↕
//! Session layer (this crate)  ← one channel, its status, its streams
//!     ↕
//! Transport + Protocol (below)  ← bytes on a socket, JSON shapes
//! ```

mod config;
mod error;
mod manager;
mod status;

pub use config::{ReconnectConfig, SessionConfig};
pub use error::SessionError;
pub use manager::{ConnectionManager, Session, SessionEvent, SessionHandle};
pub use status::ConnectionStatus;
