//! One connection attempt bound to one session token.
//!
//! DESIGN
//! ======
//! A `Session` is owned by the controller: created at startup, replaced on
//! reconnect, dropped at teardown. It pairs the lifecycle state machine with
//! the outbound link, so a send can only reach the wire while `Open`.

use crate::net::socket::{Outbound, TransportError, TransportEvent};
use crate::net::types::{ChatMessage, SessionToken};
use crate::state::connection::{ConnectionEvent, ConnectionState, TransitionError};

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("connection is {0}; message not sent")]
    NotOpen(ConnectionState),
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What a transport event meant for the session.
#[derive(Debug)]
pub enum SessionUpdate {
    Opened,
    Message(ChatMessage),
    /// Inbound frame that did not parse as a chat message.
    Dropped,
    Closed(Option<TransportError>),
}

#[derive(Debug)]
pub struct Session<L> {
    token: SessionToken,
    state: ConnectionState,
    link: L,
    trim_input: bool,
}

impl<L: Outbound> Session<L> {
    /// Bind `token` to a connection attempt already issued on `link`.
    ///
    /// Enters `Connecting`.
    pub fn begin(token: SessionToken, link: L, trim_input: bool) -> Result<Self, TransitionError> {
        let state = ConnectionState::NoToken.apply(ConnectionEvent::TokenAvailable)?;
        Ok(Self { token, state, link, trim_input })
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Feed one transport event through the state machine.
    pub fn handle_event(&mut self, event: TransportEvent) -> Result<SessionUpdate, TransitionError> {
        match event {
            TransportEvent::Opened => {
                self.advance(ConnectionEvent::Opened)?;
                Ok(SessionUpdate::Opened)
            }
            TransportEvent::Message(raw) => {
                self.advance(ConnectionEvent::Message)?;
                match ChatMessage::from_frame(&raw) {
                    Some(message) => Ok(SessionUpdate::Message(message)),
                    None => {
                        tracing::warn!(len = raw.len(), "dropping malformed inbound frame");
                        Ok(SessionUpdate::Dropped)
                    }
                }
            }
            TransportEvent::Closed => {
                self.advance(ConnectionEvent::Closed)?;
                Ok(SessionUpdate::Closed(None))
            }
            TransportEvent::Error(error) => {
                self.advance(ConnectionEvent::Errored)?;
                Ok(SessionUpdate::Closed(Some(error)))
            }
        }
    }

    /// Build a message from `input` and hand it to the transport.
    ///
    /// Fails unless the connection is `Open`. No acknowledgement is awaited.
    pub fn send_message(&mut self, input: &str, now_ms: i64) -> Result<ChatMessage, SendError> {
        if !self.state.can_send() {
            return Err(SendError::NotOpen(self.state));
        }
        let text = if self.trim_input { input.trim() } else { input };
        let message = ChatMessage::new(text, now_ms);
        self.link.send_text(message.to_frame()?)?;
        Ok(message)
    }

    fn advance(&mut self, event: ConnectionEvent) -> Result<(), TransitionError> {
        let next = self.state.apply(event)?;
        if next != self.state {
            tracing::info!(from = %self.state, to = %next, "connection state changed");
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
