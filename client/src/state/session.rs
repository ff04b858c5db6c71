//! Observer session state machine.
//!
//! DESIGN
//! ======
//! The session is the whole reconciliation policy with no I/O in it: the
//! websocket driver reports lifecycle events and inbound text, and the
//! session turns them into transcript entries, connection flags and queued
//! [`Notice`]s for the UI callbacks.
//!
//! Phases: `Disconnected -> Connecting -> Open -> {Closed | Errored} ->
//! (after delay) Connecting -> ...`. Retries are unbounded with a fixed delay.
//!
//! ATTEMPT IDENTIFIERS
//! ===================
//! Every connection attempt takes the next value of a monotonically
//! increasing counter. Transport events and delayed retries carry the value
//! captured when they were created; anything that does not match the current
//! attempt is ignored. A retry timer that outlives a manual reconnect, or
//! events that arrive after teardown, therefore have no effect.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::time::Duration;

use payloads::InboundPayload;

use super::connection::RobotConnections;
use super::notifications::Severity;
use super::transcript::{
    Message, MessageKind, SENDER_CHAT_BOT, SENDER_ROBOT, SENDER_SERVER, SENDER_SYSTEM, SENDER_USER, Transcript,
};

pub const TEXT_CONNECTING: &str = "🧪 Conectando como Observer al servidor con robots...";
pub const TEXT_RETRYING: &str = "🔄 Reintentando conexión...";
pub const TEXT_OPEN_NOTIFICATION: &str = "✅ Observer conectado - Robots activos en servidor";
pub const TEXT_OPEN: &str = "✅ Conectado como Observer - Recibirás datos automáticos";
pub const TEXT_DISCONNECTED: &str = "❌ Observer desconectado";
pub const TEXT_ERROR: &str = "❌ Error en conexión Observer";
pub const TEXT_TEARDOWN: &str = "🔌 Conexión Observer cerrada";

/// Lifecycle phase of the current connection attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closed,
    Errored,
}

/// Effect for the UI layer, drained by the driver after each event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Notification { message: String, severity: Severity },
    SystemMessage(String),
}

/// A reconnect scheduled by a close. Only honored while `attempt` is still
/// the current attempt and the socket is still closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryTicket {
    pub attempt: u64,
    pub delay: Duration,
}

#[derive(Debug)]
pub struct ObserverSession {
    transcript: Transcript,
    connections: RobotConnections,
    phase: Phase,
    attempt: u64,
    reconnect_delay: Duration,
    notices: Vec<Notice>,
}

impl ObserverSession {
    #[must_use]
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            transcript: Transcript::default(),
            connections: RobotConnections::default(),
            phase: Phase::Disconnected,
            attempt: 0,
            reconnect_delay,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn connections(&self) -> RobotConnections {
        self.connections
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    /// Drain the notices queued since the last call, in event order.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // ATTEMPTS
    // =========================================================================

    /// Start a new connection attempt and announce it in the transcript.
    ///
    /// Returns the attempt identifier, or `None` while an attempt is already
    /// connecting or open.
    pub fn begin_attempt(&mut self) -> Option<u64> {
        if matches!(self.phase, Phase::Connecting | Phase::Open) {
            return None;
        }
        self.attempt += 1;
        self.phase = Phase::Connecting;
        let announcement = if self.attempt == 1 { TEXT_CONNECTING } else { TEXT_RETRYING };
        self.push_system(SENDER_SYSTEM, announcement);
        Some(self.attempt)
    }

    /// Fire a delayed retry. A stale ticket, or one whose socket is no longer
    /// closed, is a no-op.
    pub fn retry_due(&mut self, ticket: RetryTicket) -> Option<u64> {
        if ticket.attempt != self.attempt || self.phase != Phase::Closed {
            tracing::debug!(ticket = ticket.attempt, current = self.attempt, phase = ?self.phase, "stale retry ignored");
            return None;
        }
        self.begin_attempt()
    }

    /// Manual reconnect. Supersedes any pending retry.
    pub fn request_reconnect(&mut self) -> Option<u64> {
        self.begin_attempt()
    }

    /// Scope teardown: invalidate the current attempt and drop the flag.
    pub fn teardown(&mut self) {
        self.attempt += 1;
        self.phase = Phase::Disconnected;
        self.connections.observer = false;
        self.push_system(SENDER_SYSTEM, TEXT_TEARDOWN);
    }

    // =========================================================================
    // SOCKET EVENTS
    // =========================================================================

    pub fn on_open(&mut self, attempt: u64) {
        if self.is_stale(attempt, "open") {
            return;
        }
        self.phase = Phase::Open;
        self.connections.observer = true;
        self.notify(TEXT_OPEN_NOTIFICATION, Severity::Success);
        self.push_system(SENDER_SYSTEM, TEXT_OPEN);
    }

    /// Classify one inbound frame. Always appends exactly one entry.
    pub fn on_message(&mut self, attempt: u64, raw: &str) {
        if self.is_stale(attempt, "message") {
            return;
        }
        let payload = payloads::decode(raw);
        tracing::debug!(attempt, kind = payload.kind().unwrap_or("untyped"), "observer frame");
        match payload {
            InboundPayload::WeatherUpdate(update) => {
                self.notify(&format!("📡 {}: {}°C", update.robot, update.data.temperature), Severity::Info);
                self.transcript.push(Message::new(SENDER_ROBOT, update.message, MessageKind::Robot));
            }
            InboundPayload::ChatResponse { message } => {
                self.transcript.push(Message::new(SENDER_CHAT_BOT, message, MessageKind::System));
            }
            InboundPayload::ConnectionNotice { message } => {
                self.transcript.push(Message::new(SENDER_SYSTEM, message, MessageKind::System));
            }
            InboundPayload::UnrecognizedJson { message, raw } => {
                let content = message.unwrap_or(raw);
                self.transcript.push(Message::new(SENDER_SERVER, content, MessageKind::Robot));
            }
            InboundPayload::Text(text) => {
                if payloads::is_robot_text(&text) {
                    self.transcript.push(Message::new(SENDER_ROBOT, text, MessageKind::Robot));
                } else {
                    self.transcript.push(Message::new(SENDER_SERVER, text, MessageKind::System));
                }
            }
        }
    }

    /// Transport error. Does not reconnect; the transport reports the close.
    pub fn on_error(&mut self, attempt: u64, detail: &str) {
        if self.is_stale(attempt, "error") {
            return;
        }
        tracing::warn!(attempt, error = detail, "observer connection error");
        self.phase = Phase::Errored;
        self.connections.observer = false;
        self.notify(TEXT_ERROR, Severity::Error);
        self.push_system(SENDER_SYSTEM, TEXT_ERROR);
    }

    /// Socket closed. Returns the single retry to schedule for this close.
    pub fn on_close(&mut self, attempt: u64) -> Option<RetryTicket> {
        if self.is_stale(attempt, "close") {
            return None;
        }
        self.phase = Phase::Closed;
        self.connections.observer = false;
        self.notify(TEXT_DISCONNECTED, Severity::Warning);
        self.push_system(SENDER_SYSTEM, TEXT_DISCONNECTED);
        Some(RetryTicket { attempt, delay: self.reconnect_delay })
    }

    /// Local echo of a transmitted chat line.
    pub fn record_outbound(&mut self, text: &str) {
        self.transcript.push(Message::new(SENDER_USER, text, MessageKind::User));
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn is_stale(&self, attempt: u64, event: &'static str) -> bool {
        let stale = attempt != self.attempt;
        if stale {
            tracing::debug!(attempt, current = self.attempt, event, "event from stale attempt ignored");
        }
        stale
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.notices.push(Notice::Notification { message: message.to_owned(), severity });
    }

    fn push_system(&mut self, sender: &str, content: &str) {
        self.transcript.push(Message::new(sender, content, MessageKind::System));
        self.notices.push(Notice::SystemMessage(content.to_owned()));
    }
}
