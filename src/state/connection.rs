#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::fmt;

/// Connection lifecycle.
///
/// `NoToken -> Connecting -> Open -> Closed`. `Closed` is terminal; a new
/// session is needed to connect again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    NoToken,
    Connecting,
    Open,
    Closed,
}

/// Inputs to the state machine, one per transport callback plus token arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    TokenAvailable,
    Opened,
    Message,
    Closed,
    Errored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("illegal transition: {event:?} while {from}")]
pub struct TransitionError {
    pub from: ConnectionState,
    pub event: ConnectionEvent,
}

impl ConnectionState {
    /// Apply `event`, returning the next state or the rejected transition.
    pub fn apply(self, event: ConnectionEvent) -> Result<Self, TransitionError> {
        use ConnectionEvent as E;

        match (self, event) {
            (Self::NoToken, E::TokenAvailable) => Ok(Self::Connecting),
            (Self::Connecting, E::Opened) | (Self::Open, E::Message) => Ok(Self::Open),
            (Self::Connecting | Self::Open | Self::Closed, E::Closed | E::Errored) => Ok(Self::Closed),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    /// Outbound sends are only valid while open.
    #[must_use]
    pub fn can_send(self) -> bool {
        self == Self::Open
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoToken => "no-token",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}
