//! UI controller: the single owner of the session.
//!
//! DESIGN
//! ======
//! User actions (login, submit, reconnect) and transport events arrive on one
//! task and are handled strictly one at a time, so nothing here needs a lock.
//! The controller replaces its [`Session`] on reconnect and drops it on
//! teardown; there is no shared global connection.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is logged and shown through [`Surface::alert`], then returned
//! to the caller. None are retried.

use std::time::{SystemTime, UNIX_EPOCH};

use time::UtcOffset;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::api::{AuthClient, AuthError};
use crate::net::socket::{SocketHandle, TransportEvent, spawn_socket};
use crate::net::types::{Credentials, SessionToken};
use crate::session::{SendError, Session, SessionUpdate};
use crate::state::chat::{ChatLog, format_line};
use crate::state::connection::ConnectionState;
use crate::storage::TokenStore;

/// Where the controller shows things to the user.
pub trait Surface {
    /// Blocking, user-visible notification.
    fn alert(&mut self, message: &str);
    /// Append one rendered chat line and follow it.
    fn render_line(&mut self, line: &str);
    fn set_composer_enabled(&mut self, enabled: bool);
    fn set_identity_locked(&mut self, locked: bool);
}

/// One line of chat-view input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatCommand<'a> {
    Send(&'a str),
    Reconnect,
    Quit,
    Blank,
}

impl<'a> ChatCommand<'a> {
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Self::Blank,
            "/quit" | "/exit" => Self::Quit,
            "/reconnect" => Self::Reconnect,
            _ => Self::Send(line),
        }
    }
}

pub struct Controller<S, U> {
    config: ClientConfig,
    auth: AuthClient,
    store: S,
    surface: U,
    log: ChatLog,
    offset: UtcOffset,
    identity_locked: bool,
    session: Option<Session<SocketHandle>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
}

impl<S: TokenStore, U: Surface> Controller<S, U> {
    /// Build the login client; a malformed endpoint is alerted on `surface`
    /// before the error is returned.
    pub fn new(config: ClientConfig, store: S, mut surface: U) -> Result<Self, ClientError> {
        let auth = match AuthClient::new(&config) {
            Ok(auth) => auth,
            Err(error) => {
                let error = match error {
                    AuthError::Config(config_error) => ClientError::Config(config_error),
                    other => ClientError::Login(other),
                };
                tracing::warn!(kind = ?error.kind(), %error, "client setup failed");
                surface.alert(error.alert_text());
                return Err(error);
            }
        };
        let log = ChatLog::new(config.history_limit);
        Ok(Self {
            config,
            auth,
            store,
            surface,
            log,
            offset: UtcOffset::UTC,
            identity_locked: false,
            session: None,
            events: None,
        })
    }

    /// Render timestamps at `offset` instead of UTC.
    #[must_use]
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.session.as_ref().map_or(ConnectionState::NoToken, Session::state)
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Validate, log in, and persist the issued token.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<SessionToken, ClientError> {
        let result = self.try_login(username, password).await;
        self.report(result)
    }

    async fn try_login(&mut self, username: &str, password: &str) -> Result<SessionToken, ClientError> {
        if self.identity_locked {
            return Err(ClientError::IdentityLocked);
        }
        let credentials = Credentials::new(username, password)?;
        let token = self.auth.login(&credentials).await?;
        self.store.store(&token)?;
        tracing::info!(username = credentials.username(), "login succeeded");
        Ok(token)
    }

    /// Drop any live session and forget the stored token.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.teardown();
        let result = self.store.clear().map_err(ClientError::from);
        self.report(result)
    }

    // =========================================================================
    // CONNECTION
    // =========================================================================

    /// Start a session from the stored token. Fails with `NoToken` when
    /// nothing is stored; no connection is attempted in that case.
    pub fn open_session(&mut self) -> Result<(), ClientError> {
        let result = self.try_open_session();
        self.report(result)
    }

    fn try_open_session(&mut self) -> Result<(), ClientError> {
        self.teardown();
        let token = self.store.load()?.ok_or(ClientError::NoToken)?;
        let url = self.config.ws_url(&token)?;
        let (handle, events) = spawn_socket(url);
        self.session = Some(Session::begin(token, handle, self.config.trim_input)?);
        self.events = Some(events);
        Ok(())
    }

    /// Equivalent of a page reload: fresh history, fresh session.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        self.log.clear();
        self.open_session()
    }

    /// Drop the session; the socket closes when its handle goes away.
    pub fn teardown(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("session torn down");
        }
        self.events = None;
        self.identity_locked = false;
        self.surface.set_composer_enabled(false);
        self.surface.set_identity_locked(false);
    }

    /// Wait for the next transport event. Pending forever without a live
    /// connection.
    pub async fn next_event(&mut self) -> TransportEvent {
        let Some(events) = self.events.as_mut() else {
            return std::future::pending().await;
        };
        match events.recv().await {
            Some(event) => event,
            None => {
                // Socket task ended without reporting; treat it as a close.
                self.events = None;
                if self.connection_state().is_terminal() {
                    std::future::pending().await
                } else {
                    TransportEvent::Closed
                }
            }
        }
    }

    pub fn handle_transport(&mut self, event: TransportEvent) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(?event, "transport event without a session");
            return;
        };

        match session.handle_event(event) {
            Ok(SessionUpdate::Opened) => {
                self.identity_locked = true;
                self.surface.set_composer_enabled(true);
                self.surface.set_identity_locked(true);
            }
            Ok(SessionUpdate::Message(message)) => {
                let line = format_line(&message, self.offset);
                self.surface.render_line(&line);
                self.log.push(line);
            }
            Ok(SessionUpdate::Dropped) => {}
            Ok(SessionUpdate::Closed(error)) => {
                self.events = None;
                self.surface.set_composer_enabled(false);
                let error = error.map_or(ClientError::ConnectionClosed, ClientError::from);
                let _ = self.report::<()>(Err(error));
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring transport event");
            }
        }
    }

    /// Send one line of input as a chat message.
    pub fn submit(&mut self, input: &str) -> Result<(), ClientError> {
        let result = match self.session.as_mut() {
            Some(session) => session
                .send_message(input, now_ms())
                .map(|message| tracing::debug!(len = message.text.len(), "message sent"))
                .map_err(ClientError::from),
            None => Err(SendError::NotOpen(ConnectionState::NoToken).into()),
        };
        self.report(result)
    }

    /// Chat view: open a session from the stored token, then interleave
    /// input lines and transport events until `/quit` or end of input.
    pub async fn run_chat<R>(&mut self, input: R) -> Result<(), ClientError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.open_session()?;
        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(error) => {
                            self.teardown();
                            return self.report(Err(ClientError::Input(error)));
                        }
                    };
                    match ChatCommand::parse(&line) {
                        ChatCommand::Quit => break,
                        ChatCommand::Reconnect => {
                            let _ = self.reconnect();
                        }
                        ChatCommand::Blank => {}
                        ChatCommand::Send(text) => {
                            let _ = self.submit(text);
                        }
                    }
                }
                event = self.next_event() => self.handle_transport(event),
            }
        }

        self.teardown();
        Ok(())
    }

    fn report<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(error) = &result {
            tracing::warn!(kind = ?error.kind(), %error, "client action failed");
            self.surface.alert(error.alert_text());
        }
        result
    }
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
