//! Client-side state.
//!
//! DESIGN
//! ======
//! `connection` is the pure lifecycle state machine; `chat` holds the rendered
//! message history. Neither touches the network.

pub mod chat;
pub mod connection;
