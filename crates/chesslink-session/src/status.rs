//! Connection status: the observable lifecycle of the game channel.

use std::fmt;

/// Where the channel is in its lifecycle.
///
/// ```text
/// Uninstantiated → Connecting → Open ──(close)──→ Closing → Closed
///                                 │
///                          (peer/network drop)
///                                 ▼
///                      Reconnecting { attempt } ──(dial ok)──→ Open
///                                 │
///                         (attempts exhausted)
///                                 ▼
///                               Lost
/// ```
///
/// `Closed` only ever follows a close the client asked for. A channel that
/// died on its own and couldn't be brought back ends in `Lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No connection has been requested yet.
    #[default]
    Uninstantiated,
    /// First dial in progress.
    Connecting,
    /// Traffic can flow.
    Open,
    /// A client-requested close is in progress.
    Closing,
    /// Closed at the client's request.
    Closed,
    /// The channel dropped; waiting out backoff or redialing.
    Reconnecting { attempt: u32 },
    /// The channel dropped and every reconnect attempt failed.
    Lost,
}

impl ConnectionStatus {
    /// `true` if messages can be sent.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// `true` once the session will never be `Open` again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Lost)
    }

    /// Short human-readable label, e.g. for a status line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninstantiated => "Uninstantiated",
            Self::Connecting => "Connecting",
            Self::Open => "Open",
            Self::Closing => "Closing",
            Self::Closed => "Closed",
            Self::Reconnecting { .. } => "Reconnecting",
            Self::Lost => "Lost",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconnecting { attempt } => write!(f, "Reconnecting (attempt {attempt})"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_uninstantiated() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Uninstantiated);
    }

    #[test]
    fn test_status_only_open_is_open() {
        assert!(ConnectionStatus::Open.is_open());
        assert!(!ConnectionStatus::Connecting.is_open());
        assert!(!ConnectionStatus::Reconnecting { attempt: 1 }.is_open());
        assert!(!ConnectionStatus::Closing.is_open());
    }

    #[test]
    fn test_status_terminal_states() {
        assert!(ConnectionStatus::Closed.is_terminal());
        assert!(ConnectionStatus::Lost.is_terminal());
        assert!(!ConnectionStatus::Reconnecting { attempt: 3 }.is_terminal());
        assert!(!ConnectionStatus::Uninstantiated.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ConnectionStatus::Open.to_string(), "Open");
        assert_eq!(ConnectionStatus::Uninstantiated.to_string(), "Uninstantiated");
        assert_eq!(
            ConnectionStatus::Reconnecting { attempt: 2 }.to_string(),
            "Reconnecting (attempt 2)"
        );
        assert_eq!(ConnectionStatus::Reconnecting { attempt: 2 }.label(), "Reconnecting");
    }
}
