//! Chat input composer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Whitespace-only input is ignored. When an observer connection is wired in
//! as the sink, submitted text goes out over it and the observer transcript
//! echoes it; without a sink the line lands in the composer's own local list.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use super::transcript::{Message, MessageKind, SENDER_USER};

/// Outbound path for a submitted chat line.
pub trait ChatSink {
    /// Forward `text`; returns whether it was actually transmitted.
    fn send_chat_message(&self, text: &str) -> bool;
}

#[derive(Clone, Debug, Default)]
pub struct ChatComposer {
    input: String,
    messages: Vec<Message>,
}

impl ChatComposer {
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Messages kept locally because no sink was available.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Submit the current input. Returns `false` when the input was blank and
    /// nothing happened; otherwise the input is cleared.
    pub fn submit(&mut self, sink: Option<&dyn ChatSink>) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }

        let text = std::mem::take(&mut self.input);
        match sink {
            Some(sink) => {
                if !sink.send_chat_message(&text) {
                    tracing::debug!("chat line dropped: observer not connected");
                }
            }
            None => self.messages.push(Message::new(SENDER_USER, text, MessageKind::User)),
        }
        true
    }
}
