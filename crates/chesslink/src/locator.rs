//! Finding a game to join.
//!
//! Matchmaking lives on the server side; the client only asks "which game
//! should I join for this mode?" and gets an opaque id back. The lookup is
//! a trait so an HTTP client, a lobby UI, or a test can answer it.

use std::future::Future;

use chesslink_protocol::GameId;

use crate::ChesslinkError;

/// Resolves a game mode to the id of a game to join.
///
/// # Example
///
/// ```rust
/// use chesslink::{ChesslinkError, GameId, GameLocator};
///
/// /// Always joins the same practice game.
/// struct Practice;
///
/// impl GameLocator for Practice {
///     async fn find_game(&self, _mode: &str) -> Result<GameId, ChesslinkError> {
///         Ok(GameId::new("practice"))
///     }
/// }
/// ```
pub trait GameLocator: Send + Sync + 'static {
    /// Returns the id of a game in `mode`.
    fn find_game(
        &self,
        mode: &str,
    ) -> impl Future<Output = Result<GameId, ChesslinkError>> + Send;
}

/// A locator that always answers with one known game.
#[derive(Debug, Clone)]
pub struct FixedGame(GameId);

impl FixedGame {
    pub fn new(id: impl Into<String>) -> Self {
        Self(GameId::new(id))
    }
}

impl GameLocator for FixedGame {
    async fn find_game(&self, mode: &str) -> Result<GameId, ChesslinkError> {
        tracing::debug!(mode, game_id = %self.0, "using fixed game");
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_game_ignores_mode() {
        let locator = FixedGame::new("abc");
        assert_eq!(locator.find_game("blitz").await.unwrap(), GameId::new("abc"));
        assert_eq!(locator.find_game("").await.unwrap(), GameId::new("abc"));
    }
}
