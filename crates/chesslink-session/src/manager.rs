//! The connection manager: owns the game channel on a background task.
//!
//! [`ConnectionManager::connect`] spawns one Tokio task (the "actor") per
//! channel. The actor is the only code that touches the transport: it
//! dials, decodes inbound frames, writes outbound messages, and redials
//! with backoff when the channel drops. Everyone else talks to it through
//! channels:
//!
//! ```text
//!   SessionHandle ──mpsc<Command>──→ ┌────────────┐ ──send──→ Connection
//!                                    │   actor    │
//!   Session::recv ←─mpsc<Inbound>─── │ (one task) │ ←─recv─── Connection
//!   status()      ←─watch<Status>─── └────────────┘
//! ```
//!
//! The [`Session`] returned by `connect` owns the inbound stream and the
//! task. Dropping it aborts the task, which drops the connection.

use std::sync::Arc;
use std::time::Duration;

use chesslink_protocol::{ClientMessage, Codec, InboundMessage, JsonCodec};
use chesslink_transport::{Connection, Connector};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ConnectionStatus, SessionConfig, SessionError};

/// Requests from handles to the actor. Each carries a reply channel so the
/// caller learns the outcome.
pub(crate) enum Command {
    /// Encode and write one message.
    Send {
        message: ClientMessage,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    /// Close the channel for good.
    Close { reply: oneshot::Sender<()> },
}

// ---------------------------------------------------------------------------
// ConnectionManager
// ---------------------------------------------------------------------------

/// Opens game channels with a given connector, codec, and config.
///
/// # Example
///
/// ```rust,no_run
/// use chesslink_session::ConnectionManager;
/// use chesslink_transport::WebSocketConnector;
///
/// # async fn demo() {
/// let manager = ConnectionManager::new(WebSocketConnector);
/// let mut session = manager.connect("ws://localhost:3000/game/abc");
/// while let Some(msg) = session.recv().await {
///     println!("{msg:?}");
/// }
/// # }
/// ```
pub struct ConnectionManager<C: Connector, K: Codec = JsonCodec> {
    connector: Arc<C>,
    codec: K,
    config: SessionConfig,
}

impl<C: Connector> ConnectionManager<C, JsonCodec> {
    /// Creates a manager that speaks JSON with the default config.
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            codec: JsonCodec,
            config: SessionConfig::default(),
        }
    }
}

impl<C: Connector, K: Codec + Clone> ConnectionManager<C, K> {
    /// Sets the session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts a channel to `endpoint` and returns immediately.
    ///
    /// The returned session starts in [`ConnectionStatus::Connecting`];
    /// the dial happens on the spawned task. Must be called from inside a
    /// Tokio runtime.
    pub fn connect(&self, endpoint: impl Into<String>) -> Session {
        let endpoint = endpoint.into();
        let config = self.config.clone().validated();

        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(config.inbound_capacity);

        info!(endpoint = %endpoint, "opening game channel");

        let actor = SessionActor {
            endpoint: endpoint.clone(),
            connector: Arc::clone(&self.connector),
            codec: self.codec.clone(),
            config,
            status: status_tx,
            inbound: inbound_tx,
            commands: command_rx,
        };
        let task = tokio::spawn(actor.run());

        Session {
            endpoint,
            handle: SessionHandle {
                commands: command_tx,
                status: status_rx.clone(),
            },
            inbound: inbound_rx,
            status: status_rx,
            task,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Cheap, cloneable handle for sending on a channel and reading its status.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<ConnectionStatus>,
}

impl SessionHandle {
    /// The current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Sends one message and waits until it has been written.
    ///
    /// # Errors
    /// - [`SessionError::ConnectionNotReady`] if the status isn't `Open`.
    ///   Checked before anything is queued, so nothing reaches the wire.
    /// - [`SessionError::Transport`] / [`SessionError::Protocol`] if the
    ///   write or the encoding failed.
    /// - [`SessionError::Terminated`] if the session task is gone.
    pub async fn send(&self, message: impl Into<ClientMessage>) -> Result<(), SessionError> {
        let status = self.status();
        if !status.is_open() {
            return Err(SessionError::ConnectionNotReady(status));
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Send {
                message: message.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Terminated)?;
        reply_rx.await.map_err(|_| SessionError::Terminated)?
    }

    /// Closes the channel and waits for the close to finish.
    ///
    /// Closing an already-finished session is a no-op.
    pub async fn close(&self) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Close { reply: reply_tx })
            .await
            .is_err()
        {
            return Ok(());
        }
        // A dropped reply means the task finished on its own meanwhile.
        let _ = reply_rx.await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Either kind of thing a session can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Message(InboundMessage),
    Status(ConnectionStatus),
}

/// One game channel: inbound stream, status, and the task that runs it.
///
/// The channel lives exactly as long as this value. Dropping the session
/// aborts the background task and releases the socket.
pub struct Session {
    endpoint: String,
    handle: SessionHandle,
    inbound: mpsc::Receiver<InboundMessage>,
    status: watch::Receiver<ConnectionStatus>,
    task: JoinHandle<()>,
}

impl Session {
    /// The URL this session dials.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// A handle that can send and close from elsewhere.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// The current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.handle.status()
    }

    /// See [`SessionHandle::send`].
    pub async fn send(&self, message: impl Into<ClientMessage>) -> Result<(), SessionError> {
        self.handle.send(message).await
    }

    /// See [`SessionHandle::close`].
    pub async fn close(&self) -> Result<(), SessionError> {
        self.handle.close().await
    }

    /// Waits for the next decoded inbound message.
    ///
    /// Returns `None` once the session task has finished and every
    /// buffered message has been taken. Cancel-safe.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.inbound.recv().await
    }

    /// Waits for the next status transition and returns the new status.
    ///
    /// Returns `None` once the session task has finished and the final
    /// status has been observed. Cancel-safe.
    pub async fn status_changed(&mut self) -> Option<ConnectionStatus> {
        self.status.changed().await.ok()?;
        Some(*self.status.borrow_and_update())
    }

    /// Waits for the next inbound message or status transition, whichever
    /// comes first. Buffered messages are preferred.
    ///
    /// Returns `None` once the task has finished and both streams are
    /// drained. Cancel-safe.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            biased;
            msg = self.inbound.recv() => match msg {
                Some(msg) => Some(SessionEvent::Message(msg)),
                None => self.status_changed().await.map(SessionEvent::Status),
            },
            changed = self.status.changed() => match changed {
                Ok(()) => Some(SessionEvent::Status(*self.status.borrow_and_update())),
                Err(_) => self.inbound.recv().await.map(SessionEvent::Message),
            },
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Result of one dial.
enum Dial<T> {
    Connected(T),
    Failed(String),
    /// A close arrived while dialing.
    Cancelled,
}

/// How a connected period ended.
enum Ended {
    /// The client closed (or stopped listening); the actor should stop.
    ByClient,
    /// The peer or the network dropped the channel.
    Lost,
}

struct SessionActor<C: Connector, K: Codec> {
    endpoint: String,
    connector: Arc<C>,
    codec: K,
    config: SessionConfig,
    status: watch::Sender<ConnectionStatus>,
    inbound: mpsc::Sender<InboundMessage>,
    commands: mpsc::Receiver<Command>,
}

impl<C: Connector, K: Codec> SessionActor<C, K> {
    /// Dial, serve, redial with backoff, until closed or out of attempts.
    async fn run(mut self) {
        let mut attempt: u32 = 0;

        loop {
            match self.dial().await {
                Dial::Connected(conn) => {
                    attempt = 0;
                    info!(endpoint = %self.endpoint, conn_id = %conn.id(), "channel open");
                    self.set_status(ConnectionStatus::Open);
                    match self.serve(&conn).await {
                        Ended::ByClient => return,
                        Ended::Lost => {
                            warn!(conn_id = %conn.id(), "channel lost");
                        }
                    }
                }
                Dial::Failed(reason) => {
                    warn!(endpoint = %self.endpoint, attempt, %reason, "dial failed");
                }
                Dial::Cancelled => return,
            }

            attempt += 1;
            if attempt > self.config.reconnect.max_attempts {
                warn!(
                    endpoint = %self.endpoint,
                    max_attempts = self.config.reconnect.max_attempts,
                    "giving up on channel"
                );
                self.set_status(ConnectionStatus::Lost);
                return;
            }

            self.set_status(ConnectionStatus::Reconnecting { attempt });
            let delay = self.config.reconnect.backoff_with_jitter(attempt);
            debug!(attempt, ?delay, "waiting before redial");
            if !self.wait_offline(delay).await {
                return;
            }
        }
    }

    /// One dial attempt, bounded by `connect_timeout`, still answering
    /// commands while it runs.
    async fn dial(&mut self) -> Dial<C::Connection> {
        let connector = Arc::clone(&self.connector);
        let endpoint = self.endpoint.clone();
        let dial = tokio::time::timeout(self.config.connect_timeout, async move {
            connector.connect(&endpoint).await
        });
        tokio::pin!(dial);

        loop {
            tokio::select! {
                result = &mut dial => {
                    return match result {
                        Ok(Ok(conn)) => Dial::Connected(conn),
                        Ok(Err(e)) => Dial::Failed(e.to_string()),
                        Err(_) => Dial::Failed("connect timed out".into()),
                    };
                }
                cmd = self.commands.recv() => {
                    if !self.handle_offline(cmd) {
                        return Dial::Cancelled;
                    }
                }
            }
        }
    }

    /// Sleeps for `delay` while answering commands. Returns `false` if the
    /// session was closed during the wait.
    async fn wait_offline(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                () = &mut sleep => return true,
                cmd = self.commands.recv() => {
                    if !self.handle_offline(cmd) {
                        return false;
                    }
                }
            }
        }
    }

    /// Answers a command while no connection exists. Returns `false` if the
    /// actor should stop.
    fn handle_offline(&self, cmd: Option<Command>) -> bool {
        match cmd {
            Some(Command::Send { reply, .. }) => {
                let status = *self.status.borrow();
                let _ = reply.send(Err(SessionError::ConnectionNotReady(status)));
                true
            }
            Some(Command::Close { reply }) => {
                self.set_status(ConnectionStatus::Closed);
                let _ = reply.send(());
                false
            }
            None => {
                self.set_status(ConnectionStatus::Closed);
                false
            }
        }
    }

    /// Pumps one open connection until it ends.
    ///
    /// A decoded frame waits in `pending` until the inbound queue has room.
    /// The socket is not read while a frame is pending, so a slow consumer
    /// backs pressure onto the peer but never stalls outbound commands.
    async fn serve(&mut self, conn: &C::Connection) -> Ended {
        let mut pending: Option<InboundMessage> = None;

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send { message, reply }) => {
                        let result = self.write(conn, &message).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Close { reply }) => {
                        self.shutdown(conn).await;
                        let _ = reply.send(());
                        return Ended::ByClient;
                    }
                    None => {
                        self.shutdown(conn).await;
                        return Ended::ByClient;
                    }
                },
                permit = self.inbound.reserve(), if pending.is_some() => match permit {
                    Ok(permit) => {
                        if let Some(msg) = pending.take() {
                            permit.send(msg);
                        }
                    }
                    Err(_) => {
                        debug!("inbound consumer gone, closing");
                        self.shutdown(conn).await;
                        return Ended::ByClient;
                    }
                },
                frame = conn.recv(), if pending.is_none() => match frame {
                    Ok(Some(bytes)) => pending = self.decode(&bytes),
                    Ok(None) => {
                        info!(conn_id = %conn.id(), "peer closed the channel");
                        return Ended::Lost;
                    }
                    Err(e) => {
                        warn!(conn_id = %conn.id(), error = %e, "receive failed");
                        return Ended::Lost;
                    }
                },
            }
        }
    }

    async fn write(
        &self,
        conn: &C::Connection,
        message: &ClientMessage,
    ) -> Result<(), SessionError> {
        let bytes = self.codec.encode(message)?;
        conn.send(&bytes).await?;
        debug!(conn_id = %conn.id(), ?message, "sent");
        Ok(())
    }

    /// Decodes one frame. Malformed frames are logged and dropped.
    fn decode(&self, bytes: &[u8]) -> Option<InboundMessage> {
        match self.codec.decode::<InboundMessage>(bytes) {
            Ok(msg) => {
                debug!(message_type = %msg.message_type(), "received");
                Some(msg)
            }
            Err(e) => {
                warn!(error = %e, "dropping malformed message");
                None
            }
        }
    }

    async fn shutdown(&self, conn: &C::Connection) {
        self.set_status(ConnectionStatus::Closing);
        if let Err(e) = conn.close().await {
            debug!(conn_id = %conn.id(), error = %e, "close failed");
        }
        self.set_status(ConnectionStatus::Closed);
    }

    fn set_status(&self, status: ConnectionStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            info!(%previous, %status, "connection status changed");
        }
    }
}
