//! Transcript entries shown in the observer panel.
//!
//! DESIGN
//! ======
//! The transcript is append-only: insertion order is arrival order is display
//! order. Nothing in the client edits or removes an entry once pushed.

#[cfg(test)]
#[path = "transcript_test.rs"]
mod transcript_test;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const SENDER_SYSTEM: &str = "Sistema";
pub const SENDER_ROBOT: &str = "Robot";
pub const SENDER_SERVER: &str = "Servidor";
pub const SENDER_CHAT_BOT: &str = "Chat Bot";
pub const SENDER_USER: &str = "Usuario";

/// Visual category of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Robot,
    System,
    User,
    Notification,
}

/// A single displayed line.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub sender: String,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub kind: MessageKind,
}

impl Message {
    /// Build an entry stamped with the current wall-clock time.
    #[must_use]
    pub fn new(sender: &str, content: impl Into<String>, kind: MessageKind) -> Self {
        Self { sender: sender.to_owned(), content: content.into(), timestamp: now_ms(), kind }
    }

    /// `HH:MM:SS` of the timestamp in the host's local time.
    ///
    /// Falls back to UTC when the local offset cannot be determined.
    #[must_use]
    pub fn clock(&self) -> String {
        self.clock_in(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// `HH:MM:SS` of the timestamp at a fixed offset.
    #[must_use]
    pub fn clock_in(&self, offset: UtcOffset) -> String {
        at_unix_ms(self.timestamp)
            .and_then(|instant| instant.to_offset(offset).format(format_description!("[hour]:[minute]:[second]")).ok())
            .unwrap_or_else(|| "--:--:--".to_owned())
    }
}

/// Ordered, append-only list of [`Message`]s.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    entries: Vec<Message>,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Entries appended at or after `index`; empty when `index` is past the end.
    #[must_use]
    pub fn since(&self, index: usize) -> &[Message] {
        self.entries.get(index..).unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}

pub(crate) fn now_ms() -> i64 {
    i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
}

/// `None` outside the range `time` can represent.
pub(crate) fn at_unix_ms(unix_ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(unix_ms) * 1_000_000).ok()
}
