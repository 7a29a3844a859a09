//! Error types for the session layer.

use chesslink_protocol::ProtocolError;
use chesslink_transport::TransportError;

use crate::ConnectionStatus;

/// Errors surfaced to callers of the connection manager.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `send` was called while the channel wasn't `Open`. Nothing was
    /// queued or written; the caller decides whether to retry.
    #[error("connection not ready (status: {0})")]
    ConnectionNotReady(ConnectionStatus),

    /// The transport failed while writing the message.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The background connection task is gone (the session was closed or
    /// dropped).
    #[error("session task has terminated")]
    Terminated,
}
