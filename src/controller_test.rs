use super::*;
use crate::error::ErrorKind;
use crate::storage::MemoryTokenStore;

#[derive(Debug, Default)]
struct RecordingSurface {
    alerts: Vec<String>,
    lines: Vec<String>,
    composer_enabled: bool,
    identity_locked: bool,
}

impl Surface for RecordingSurface {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }

    fn render_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn set_composer_enabled(&mut self, enabled: bool) {
        self.composer_enabled = enabled;
    }

    fn set_identity_locked(&mut self, locked: bool) {
        self.identity_locked = locked;
    }
}

/// Lends a surface to a controller so the caller can inspect it afterwards.
impl Surface for &mut RecordingSurface {
    fn alert(&mut self, message: &str) {
        (**self).alert(message);
    }

    fn render_line(&mut self, line: &str) {
        (**self).render_line(line);
    }

    fn set_composer_enabled(&mut self, enabled: bool) {
        (**self).set_composer_enabled(enabled);
    }

    fn set_identity_locked(&mut self, locked: bool) {
        (**self).set_identity_locked(locked);
    }
}

/// Points at a port nothing listens on; these tests never reach the network.
fn offline_config() -> ClientConfig {
    ClientConfig { port: 9, request_timeout_secs: 1, ..ClientConfig::default() }
}

fn controller(store: MemoryTokenStore) -> Controller<MemoryTokenStore, RecordingSurface> {
    Controller::new(offline_config(), store, RecordingSurface::default()).unwrap()
}

// =============================================================
// ChatCommand
// =============================================================

#[test]
fn chat_command_parse() {
    assert_eq!(ChatCommand::parse("   "), ChatCommand::Blank);
    assert_eq!(ChatCommand::parse("/quit"), ChatCommand::Quit);
    assert_eq!(ChatCommand::parse(" /exit "), ChatCommand::Quit);
    assert_eq!(ChatCommand::parse("/reconnect"), ChatCommand::Reconnect);
    assert_eq!(ChatCommand::parse(" hello "), ChatCommand::Send(" hello "));
}

// =============================================================
// Controller without a server
// =============================================================

#[test]
fn new_rejects_invalid_host_as_config_error() {
    let config = ClientConfig { host: "bad host".into(), ..ClientConfig::default() };
    let err = Controller::new(config, MemoryTokenStore::default(), RecordingSurface::default())
        .err()
        .expect("invalid host");
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn new_alerts_when_setup_fails() {
    let config = ClientConfig { host: "bad host".into(), ..ClientConfig::default() };
    let mut surface = RecordingSurface::default();
    let kind = Controller::new(config, MemoryTokenStore::default(), &mut surface).err().map(|e| e.kind());

    assert_eq!(kind, Some(ErrorKind::Config));
    assert_eq!(surface.alerts, vec!["Invalid client configuration"]);
}

#[tokio::test]
async fn login_validation_failure_alerts_and_stores_nothing() {
    let mut ctl = controller(MemoryTokenStore::default());
    let err = ctl.login("a", "secret").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(ctl.surface().alerts, vec!["Invalid username or password"]);
    assert!(ctl.store().load().unwrap().is_none());
}

#[tokio::test]
async fn login_network_failure_is_login_kind() {
    let mut ctl = controller(MemoryTokenStore::default());
    let err = ctl.login("alice", "secret").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Login);
    assert_eq!(ctl.surface().alerts, vec!["Login failed"]);
    assert!(ctl.store().load().unwrap().is_none());
}

#[test]
fn open_session_without_token_is_fatal() {
    let mut ctl = controller(MemoryTokenStore::default());
    let err = ctl.open_session().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoToken);
    assert_eq!(ctl.connection_state(), ConnectionState::NoToken);
    assert_eq!(ctl.surface().alerts, vec!["No token found"]);
}

#[test]
fn submit_without_session_fails() {
    let mut ctl = controller(MemoryTokenStore::default());
    let err = ctl.submit("hi").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Send);
    assert_eq!(ctl.surface().alerts, vec!["Message not sent"]);
}

#[test]
fn transport_event_without_session_is_ignored() {
    let mut ctl = controller(MemoryTokenStore::default());
    ctl.handle_transport(TransportEvent::Opened);
    assert!(ctl.surface().alerts.is_empty());
    assert!(!ctl.surface().composer_enabled);
}

#[test]
fn logout_clears_stored_token() {
    let token = SessionToken::new("abc").unwrap();
    let mut ctl = controller(MemoryTokenStore::with_token(token));
    ctl.logout().unwrap();
    assert!(ctl.store().load().unwrap().is_none());
}

#[tokio::test]
async fn connect_failure_closes_and_alerts() {
    let token = SessionToken::new("abc").unwrap();
    let mut ctl = controller(MemoryTokenStore::with_token(token));
    ctl.open_session().unwrap();
    assert_eq!(ctl.connection_state(), ConnectionState::Connecting);

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), ctl.next_event())
        .await
        .expect("connect attempt should fail quickly");
    assert!(matches!(event, TransportEvent::Error(_)));
    ctl.handle_transport(event);

    assert_eq!(ctl.connection_state(), ConnectionState::Closed);
    assert_eq!(ctl.surface().alerts.len(), 1);
    assert_eq!(ctl.submit("hi").unwrap_err().kind(), ErrorKind::Send);
}
