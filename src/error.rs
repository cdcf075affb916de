//! Top-level client error.
//!
//! Each concern has its own error type; `ClientError` folds them together and
//! [`ErrorKind`] discriminates them for callers that only need the category.
//! Every variant is terminal to the user action that raised it.

use crate::config::ConfigError;
use crate::net::api::AuthError;
use crate::net::socket::TransportError;
use crate::net::types::ValidationError;
use crate::session::SendError;
use crate::state::connection::TransitionError;
use crate::storage::StorageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Login,
    Transport,
    NoToken,
    Send,
    Storage,
    Config,
    Input,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid credentials: {0}")]
    Validation(#[from] ValidationError),
    #[error("identity is locked while connected")]
    IdentityLocked,
    #[error("authentication failed: {0}")]
    Login(#[from] AuthError),
    #[error("connection failed: {0}")]
    Transport(#[from] TransportError),
    #[error("connection closed by server")]
    ConnectionClosed,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("no session token found; log in first")]
    NoToken,
    #[error(transparent)]
    Send(#[from] SendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("reading input failed: {0}")]
    Input(#[source] std::io::Error),
}

impl ClientError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::IdentityLocked => ErrorKind::Validation,
            Self::Login(_) => ErrorKind::Login,
            Self::Transport(_) | Self::ConnectionClosed | Self::Transition(_) => ErrorKind::Transport,
            Self::NoToken => ErrorKind::NoToken,
            Self::Send(_) => ErrorKind::Send,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
            Self::Input(_) => ErrorKind::Input,
        }
    }

    /// Short text for the user-facing alert.
    #[must_use]
    pub fn alert_text(&self) -> &'static str {
        if matches!(self, Self::IdentityLocked) {
            return "Already connected; log out before switching users";
        }
        match self.kind() {
            ErrorKind::Validation => "Invalid username or password",
            ErrorKind::Login => "Login failed",
            ErrorKind::Transport => "Connection lost; use /reconnect to try again",
            ErrorKind::NoToken => "No token found",
            ErrorKind::Send => "Message not sent",
            ErrorKind::Storage => "Could not access token storage",
            ErrorKind::Config => "Invalid client configuration",
            ErrorKind::Input => "Could not read input",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
