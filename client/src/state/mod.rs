//! Client-side state for the observer panel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` is the connection state machine the websocket driver feeds;
//! `transcript` and `connection` are the snapshots it exposes to the UI.
//! `notifications` and `chat` are the toast list and the input composer that
//! sit beside it.

pub mod chat;
pub mod connection;
pub mod notifications;
pub mod session;
pub mod transcript;
