//! Networking for the observer websocket.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the socket seam (trait plus the tokio-tungstenite
//! implementation); `observer_client` runs the connection lifecycle on top of
//! it and feeds `state::session`.

pub mod observer_client;
pub mod transport;
