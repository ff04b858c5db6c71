//! Reconnecting observer websocket client.
//!
//! `ObserverClient` owns the connection lifecycle: it spawns one driver task
//! that connects, feeds socket events into [`ObserverSession`], forwards chat
//! lines while the socket is open and retries after a fixed delay whenever
//! the socket closes. The handle is the only owner of that task; `shutdown`
//! (or dropping the handle) closes the socket and stops retrying.
//!
//! ORDERING
//! ========
//! Session updates happen only on the driver task, plus the local echo in
//! `send_chat_message`. The session mutex is never held across an `.await`,
//! and callbacks run after it is released, in event order.

#[cfg(test)]
#[path = "observer_client_test.rs"]
mod observer_client_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::transport::{Connector, Socket, TungsteniteConnector};
use crate::config::ObserverConfig;
use crate::state::chat::ChatSink;
use crate::state::connection::RobotConnections;
use crate::state::notifications::Severity;
use crate::state::session::{Notice, ObserverSession, Phase, RetryTicket};
use crate::state::transcript::Message;

pub type NotificationCallback = Arc<dyn Fn(&str, Severity) + Send + Sync>;
pub type SystemMessageCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional upward callbacks. Missing callbacks are skipped.
#[derive(Clone, Default)]
pub struct ObserverCallbacks {
    on_notification: Option<NotificationCallback>,
    on_system_message: Option<SystemMessageCallback>,
}

impl ObserverCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_notification(mut self, callback: impl Fn(&str, Severity) + Send + Sync + 'static) -> Self {
        self.on_notification = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_system_message(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_system_message = Some(Arc::new(callback));
        self
    }

    fn dispatch(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Notification { message, severity } => {
                    if let Some(callback) = &self.on_notification {
                        callback(&message, severity);
                    }
                }
                Notice::SystemMessage(message) => {
                    if let Some(callback) = &self.on_system_message {
                        callback(&message);
                    }
                }
            }
        }
    }
}

enum Command {
    Reconnect,
    Shutdown,
}

/// Outcome of one attempt, as seen by the retry loop.
enum Flow {
    Closed(Option<RetryTicket>),
    Stopped,
}

/// Why the open-socket loop ended.
enum End {
    Closed,
    Failed(String),
    Shutdown,
}

// =============================================================================
// SHARED STATE
// =============================================================================

struct Shared {
    session: Mutex<ObserverSession>,
    callbacks: ObserverCallbacks,
    /// Transcript length after the latest update.
    revision: watch::Sender<usize>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ObserverSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one session update, then publish the revision and fire callbacks.
    fn apply<T>(&self, update: impl FnOnce(&mut ObserverSession) -> T) -> T {
        let (out, notices, len) = {
            let mut session = self.lock();
            let out = update(&mut session);
            (out, session.take_notices(), session.transcript().len())
        };
        self.revision.send_replace(len);
        self.callbacks.dispatch(notices);
        out
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Scope-lifetime handle to the observer connection.
pub struct ObserverClient {
    shared: Arc<Shared>,
    outbound: mpsc::UnboundedSender<String>,
    commands: mpsc::UnboundedSender<Command>,
    updates: watch::Receiver<usize>,
    task: Option<JoinHandle<()>>,
}

impl ObserverClient {
    /// Connect to `config.url` over `tokio-tungstenite`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn start(config: &ObserverConfig, callbacks: ObserverCallbacks) -> Self {
        Self::start_with(config, TungsteniteConnector, callbacks)
    }

    /// Same as [`Self::start`] with a caller-supplied transport.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn start_with(
        config: &ObserverConfig,
        connector: impl Connector + 'static,
        callbacks: ObserverCallbacks,
    ) -> Self {
        let (revision, updates) = watch::channel(0);
        let shared = Arc::new(Shared {
            session: Mutex::new(ObserverSession::new(config.reconnect_delay)),
            callbacks,
            revision,
        });
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (retry_tx, retry_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            url: config.url.clone(),
            connector: Arc::new(connector),
            shared: Arc::clone(&shared),
            outbound: outbound_rx,
            commands: command_rx,
            retry_tx,
            retries: retry_rx,
        };
        let task = tokio::spawn(driver.run());

        Self { shared, outbound: outbound_tx, commands: command_tx, updates, task: Some(task) }
    }

    /// Transmit `text` and echo it locally as a user entry.
    ///
    /// Silently drops the text unless the socket is open; the return value
    /// says whether it went out.
    pub fn send_chat_message(&self, text: &str) -> bool {
        let sent = self.shared.apply(|session| {
            if !session.is_open() || self.outbound.send(text.to_owned()).is_err() {
                return false;
            }
            session.record_outbound(text);
            true
        });
        if !sent {
            tracing::debug!("chat message dropped: observer not connected");
        }
        sent
    }

    /// Start a fresh attempt now. Ignored while connecting or open.
    pub fn reconnect(&self) {
        if self.commands.send(Command::Reconnect).is_err() {
            tracing::debug!("reconnect requested after driver stopped");
        }
    }

    #[must_use]
    pub fn transcript(&self) -> Vec<Message> {
        self.shared.lock().transcript().entries().to_vec()
    }

    /// Entries appended at or after `index`.
    #[must_use]
    pub fn transcript_since(&self, index: usize) -> Vec<Message> {
        self.shared.lock().transcript().since(index).to_vec()
    }

    #[must_use]
    pub fn connections(&self) -> RobotConnections {
        self.shared.lock().connections()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.lock().phase()
    }

    /// Watch channel carrying the transcript length; changes on every update.
    #[must_use]
    pub fn updates(&self) -> watch::Receiver<usize> {
        self.updates.clone()
    }

    /// Close the socket, stop retrying and return the final transcript.
    pub async fn shutdown(mut self) -> Vec<Message> {
        if let Some(task) = self.task.take() {
            if self.commands.send(Command::Shutdown).is_ok() {
                if let Err(error) = task.await {
                    tracing::warn!(%error, "observer driver task failed");
                }
            }
        }
        self.transcript()
    }
}

impl ChatSink for ObserverClient {
    fn send_chat_message(&self, text: &str) -> bool {
        ObserverClient::send_chat_message(self, text)
    }
}

impl Drop for ObserverClient {
    fn drop(&mut self) {
        if self.task.is_some() {
            // The driver also tears down once the command channel closes.
            if self.commands.send(Command::Shutdown).is_err() {
                tracing::debug!("observer driver already stopped");
            }
        }
    }
}

// =============================================================================
// DRIVER
// =============================================================================

struct Driver {
    url: String,
    connector: Arc<dyn Connector>,
    shared: Arc<Shared>,
    outbound: mpsc::UnboundedReceiver<String>,
    commands: mpsc::UnboundedReceiver<Command>,
    retry_tx: mpsc::UnboundedSender<RetryTicket>,
    retries: mpsc::UnboundedReceiver<RetryTicket>,
}

impl Driver {
    async fn run(mut self) {
        let mut next = self.shared.apply(ObserverSession::begin_attempt);

        loop {
            if let Some(attempt) = next.take() {
                match self.run_attempt(attempt).await {
                    Flow::Closed(Some(ticket)) => self.schedule_retry(ticket),
                    Flow::Closed(None) => {}
                    Flow::Stopped => return,
                }
                continue;
            }

            tokio::select! {
                Some(ticket) = self.retries.recv() => {
                    next = self.shared.apply(|session| session.retry_due(ticket));
                }
                command = self.commands.recv() => match command {
                    Some(Command::Reconnect) => next = self.shared.apply(ObserverSession::request_reconnect),
                    Some(Command::Shutdown) | None => break,
                },
                Some(text) = self.outbound.recv() => {
                    tracing::debug!(len = text.len(), "discarding chat frame queued while disconnected");
                }
            }
        }

        self.stop();
    }

    async fn run_attempt(&mut self, attempt: u64) -> Flow {
        tracing::info!(url = %self.url, attempt, "observer connecting");

        let connector = Arc::clone(&self.connector);
        let url = self.url.clone();
        let connect = connector.connect(&url);
        tokio::pin!(connect);

        let connected = loop {
            tokio::select! {
                result = &mut connect => break result,
                command = self.commands.recv() => match command {
                    Some(Command::Reconnect) => {}
                    Some(Command::Shutdown) | None => {
                        self.stop();
                        return Flow::Stopped;
                    }
                },
            }
        };

        let mut socket = match connected {
            Ok(socket) => socket,
            Err(error) => {
                self.shared.apply(|session| session.on_error(attempt, &error.to_string()));
                return Flow::Closed(self.shared.apply(|session| session.on_close(attempt)));
            }
        };

        self.shared.apply(|session| session.on_open(attempt));
        tracing::info!(attempt, "observer connected");

        let end = loop {
            tokio::select! {
                inbound = socket.recv() => match inbound {
                    Some(Ok(text)) => self.shared.apply(|session| session.on_message(attempt, &text)),
                    Some(Err(error)) => break End::Failed(error.to_string()),
                    None => break End::Closed,
                },
                Some(text) = self.outbound.recv() => {
                    if let Err(error) = socket.send_text(text).await {
                        break End::Failed(error.to_string());
                    }
                }
                command = self.commands.recv() => match command {
                    Some(Command::Reconnect) => {}
                    Some(Command::Shutdown) | None => break End::Shutdown,
                },
            }
        };

        // Leave `Open` under the lock first: from here on no chat line is
        // accepted, so the queue holds exactly the lines reported as sent.
        let flow = match end {
            End::Closed => Flow::Closed(self.shared.apply(|session| session.on_close(attempt))),
            End::Failed(detail) => {
                self.shared.apply(|session| session.on_error(attempt, &detail));
                Flow::Closed(self.shared.apply(|session| session.on_close(attempt)))
            }
            End::Shutdown => {
                self.stop();
                Flow::Stopped
            }
        };
        self.flush_outbound(socket.as_mut()).await;
        close_quietly(socket.as_mut()).await;
        tracing::info!(attempt, "observer disconnected");
        flow
    }

    /// Best-effort delivery of chat lines accepted before the socket left `Open`.
    async fn flush_outbound(&mut self, socket: &mut dyn Socket) {
        while let Ok(text) = self.outbound.try_recv() {
            if let Err(error) = socket.send_text(text).await {
                tracing::debug!(%error, "chat frame lost while closing");
            }
        }
    }

    fn stop(&self) {
        self.shared.apply(ObserverSession::teardown);
        tracing::info!(url = %self.url, "observer stopped");
    }

    fn schedule_retry(&self, ticket: RetryTicket) {
        tracing::info!(attempt = ticket.attempt, delay = ?ticket.delay, "observer reconnect scheduled");
        let retry_tx = self.retry_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            if retry_tx.send(ticket).is_err() {
                tracing::debug!(attempt = ticket.attempt, "retry dropped: observer stopped");
            }
        });
    }
}

async fn close_quietly(socket: &mut dyn Socket) {
    if let Err(error) = socket.close().await {
        tracing::debug!(%error, "observer socket close failed");
    }
}
