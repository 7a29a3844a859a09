//! `GameClient` builder and event loop.
//!
//! This is the entry point for playing a game. It ties the layers
//! together: transport → protocol → session → game.

use chesslink_game::{
    Applied, ClickOutcome, GameInfo, GameStore, HistoryTurn, Orientation, SelectionMachine,
    apply, history,
};
use chesslink_protocol::{GameId, Square};
use chesslink_session::{
    ConnectionManager, ConnectionStatus, Session, SessionConfig, SessionEvent,
};
use chesslink_transport::Connector;
use tracing::{debug, info};

use crate::{ChesslinkError, GameLocator};

/// Something that changed while the client was waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    /// An inbound message was applied to the store.
    Applied(Applied),
    /// The channel moved to a new status.
    StatusChanged(ConnectionStatus),
}

// ---------------------------------------------------------------------------
// GameClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and connecting a [`GameClient`].
///
/// # Example
///
/// ```rust,no_run
/// use chesslink::prelude::*;
///
/// # async fn demo() -> Result<(), ChesslinkError> {
/// let mut client = GameClient::builder()
///     .host("localhost:3000")
///     .orientation(Orientation::Reversed)
///     .find_and_connect(WebSocketConnector, &FixedGame::new("abc"), "classic")
///     .await?;
///
/// while let Some(event) = client.next_event().await {
///     println!("{event:?}: {:?}", client.info());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GameClientBuilder {
    host: String,
    secure: bool,
    orientation: Orientation,
    session_config: SessionConfig,
}

impl GameClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            host: "localhost:3000".to_string(),
            secure: false,
            orientation: Orientation::default(),
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the server host, with an optional port (`example.com:443`).
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    /// Use `wss://` instead of `ws://`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets which way up the board is drawn.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// The channel URL for `game_id`.
    pub fn endpoint(&self, game_id: &GameId) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}/game/{game_id}", self.host)
    }

    /// Opens the channel for `game_id` and returns immediately.
    ///
    /// The client starts out `Connecting`; watch
    /// [`GameClient::next_event`] for the transition to `Open`. Must be
    /// called from inside a Tokio runtime.
    pub fn connect<C: Connector>(self, connector: C, game_id: GameId) -> GameClient {
        let endpoint = self.endpoint(&game_id);
        info!(game_id = %game_id, endpoint = %endpoint, "joining game");
        let session = ConnectionManager::new(connector)
            .config(self.session_config)
            .connect(endpoint);

        GameClient {
            game_id,
            session,
            store: GameStore::new(),
            selection: SelectionMachine::new(),
            orientation: self.orientation,
        }
    }

    /// Asks `locator` for a game in `mode`, then connects to it.
    pub async fn find_and_connect<C: Connector>(
        self,
        connector: C,
        locator: &impl GameLocator,
        mode: &str,
    ) -> Result<GameClient, ChesslinkError> {
        let game_id = locator.find_game(mode).await?;
        Ok(self.connect(connector, game_id))
    }
}

impl Default for GameClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// GameClient
// ---------------------------------------------------------------------------

/// One joined game: the channel, the local store, and the click state.
///
/// Every mutating call takes `&mut self`, so inbound messages and clicks
/// never interleave. Dropping the client closes the channel.
pub struct GameClient {
    game_id: GameId,
    session: Session,
    store: GameStore,
    selection: SelectionMachine,
    orientation: Orientation,
}

impl GameClient {
    /// Creates a new builder.
    pub fn builder() -> GameClientBuilder {
        GameClientBuilder::new()
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionMachine {
        &self.selection
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Turns the board around. The current selection is kept.
    pub fn flip_board(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Waits for the next inbound message or status change and applies it.
    ///
    /// Returns `None` once the channel is finished for good (closed or
    /// lost) and everything buffered has been applied. Cancel-safe, so it
    /// can sit in `tokio::select!` next to user input.
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        match self.session.next_event().await? {
            SessionEvent::Message(msg) => {
                let applied = apply(msg, &mut self.store);
                if applied == Applied::GameEnded {
                    // No further moves will be accepted for this game.
                    self.selection.reset();
                }
                Some(ClientEvent::Applied(applied))
            }
            SessionEvent::Status(status) => {
                debug!(game_id = %self.game_id, %status, "channel status");
                Some(ClientEvent::StatusChanged(status))
            }
        }
    }

    /// Handles a click at visual position `visual`.
    ///
    /// A click that completes a legal move sends it to the server before
    /// returning. The local board doesn't change until the server answers
    /// with a new snapshot.
    ///
    /// # Errors
    /// Fails if a move was emitted but couldn't be sent, e.g.
    /// [`SessionError::ConnectionNotReady`](chesslink_session::SessionError::ConnectionNotReady)
    /// while reconnecting. The selection is reset either way.
    pub async fn click(&mut self, visual: Square) -> Result<ClickOutcome, ChesslinkError> {
        let square = self.orientation.to_canonical(visual);
        let outcome = self.selection.click(square, self.store.state());
        if let ClickOutcome::MoveEmitted(mv) = &outcome {
            self.session.send(mv.clone()).await?;
            info!(game_id = %self.game_id, %mv, "move sent");
        }
        Ok(outcome)
    }

    /// Visual positions of the legal destinations for the selected piece.
    pub fn highlighted(&self) -> Vec<Square> {
        self.selection
            .targets(self.store.state())
            .map(|sq| self.orientation.to_visual(sq))
            .collect()
    }

    /// Asks the server to replay the position after ply `ply`.
    ///
    /// Nothing changes locally; the answer arrives as a normal snapshot.
    pub async fn search_history(&self, ply: usize) -> Result<(), ChesslinkError> {
        let query = history::search_query(self.store.previous_moves(), ply)?;
        self.session.send(query).await?;
        debug!(game_id = %self.game_id, ply, "history search sent");
        Ok(())
    }

    /// The status panel summary.
    pub fn info(&self) -> GameInfo {
        self.store.info(&self.game_id, self.status().label())
    }

    /// Played moves, paired into numbered turns.
    pub fn history(&self) -> Vec<HistoryTurn> {
        history::turns(self.store.previous_moves())
    }

    /// Closes the channel and waits for the close to finish.
    pub async fn close(&self) -> Result<(), ChesslinkError> {
        info!(game_id = %self.game_id, "leaving game");
        self.session.close().await?;
        Ok(())
    }
}
