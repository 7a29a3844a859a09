//! Game-side logic for Chesslink.
//!
//! Everything here is synchronous and owns no I/O:
//!
//! - [`GameStore`]: the latest snapshot plus status and end-of-game text.
//! - [`apply`]: folds one inbound message into the store.
//! - [`SelectionMachine`]: turns two clicks into a legal [`Move`](chesslink_protocol::Move).
//! - [`Orientation`]: maps visual board positions to canonical squares.
//! - [`history`]: pairs plies into numbered turns and builds replay queries.

mod dispatch;
mod error;
pub mod history;
mod orientation;
mod selection;
mod store;

pub use dispatch::{Applied, apply};
pub use error::GameError;
pub use history::{HistoryTurn, PlyEntry};
pub use orientation::Orientation;
pub use selection::{ClickOutcome, RejectReason, Selection, SelectionMachine};
pub use store::{DEFAULT_STATUS, GAME_CONTINUING, GameInfo, GameStore};
