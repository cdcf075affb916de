//! # chatroom-client
//!
//! Terminal client for the chatroom server. Logs in over HTTP, keeps the
//! issued session token in a small on-disk store, opens a token-authenticated
//! WebSocket, renders inbound chat messages, and sends outbound ones.
//!
//! The [`controller::Controller`] owns the one live [`session::Session`];
//! everything reaches the user through a [`controller::Surface`].

pub mod config;
pub mod controller;
pub mod error;
pub mod net;
pub mod session;
pub mod state;
pub mod storage;
pub mod terminal;

pub use config::ClientConfig;
pub use controller::{ChatCommand, Controller, Surface};
pub use error::{ClientError, ErrorKind};
