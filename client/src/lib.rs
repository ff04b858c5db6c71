//! Observer client library.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` owns the observer websocket (transport seam plus the reconnecting
//! driver), `state` holds the transcript, connection flags and the pure
//! session state machine the driver feeds, and `services` wraps the HTTP
//! collaborators: Google sign-in and the Open-Meteo lookup.

pub mod config;
pub mod net;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, ObserverConfig};
pub use net::observer_client::{ObserverCallbacks, ObserverClient};
pub use state::notifications::Severity;
pub use state::transcript::{Message, MessageKind};
