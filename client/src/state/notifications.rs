//! Transient notification toasts.
//!
//! DESIGN
//! ======
//! Every push schedules exactly one eviction `ttl` later, and each eviction
//! drops the oldest toast still showing. Deadlines are pushed in order, so a
//! FIFO of deadlines next to the FIFO of toasts is enough; callers drive time
//! through `expire(now)`.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use super::transcript::{Message, MessageKind, SENDER_SYSTEM};

/// Severity attached to an upward notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub message: Message,
    pub severity: Severity,
}

#[derive(Debug)]
pub struct NotificationQueue {
    ttl: Duration,
    items: VecDeque<Notification>,
    deadlines: VecDeque<Instant>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, items: VecDeque::new(), deadlines: VecDeque::new() }
    }

    pub fn push(&mut self, text: &str, severity: Severity, now: Instant) {
        self.items.push_back(Notification {
            message: Message::new(SENDER_SYSTEM, text, MessageKind::Notification),
            severity,
        });
        self.deadlines.push_back(now + self.ttl);
    }

    /// Apply every eviction due at `now`. Returns how many toasts were dropped.
    pub fn expire(&mut self, now: Instant) -> usize {
        let mut dropped = 0;
        while self.deadlines.front().is_some_and(|deadline| *deadline <= now) {
            self.deadlines.pop_front();
            if self.items.pop_front().is_some() {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
