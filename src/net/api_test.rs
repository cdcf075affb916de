use super::*;

#[test]
fn auth_client_targets_configured_login_path() {
    let config = ClientConfig { login_path: "/login".into(), ..ClientConfig::default() };
    let client = AuthClient::new(&config).unwrap();
    assert_eq!(client.login_url().as_str(), "http://127.0.0.1:8082/login");
}

#[test]
fn auth_client_rejects_invalid_host() {
    let config = ClientConfig { host: "not a host".into(), ..ClientConfig::default() };
    assert!(matches!(AuthClient::new(&config), Err(AuthError::Config(_))));
}

#[test]
fn in_flight_guard_is_exclusive_until_dropped() {
    let flag = AtomicBool::new(false);
    let first = InFlightGuard::acquire(&flag).expect("first acquire");
    assert!(InFlightGuard::acquire(&flag).is_none());
    drop(first);
    assert!(InFlightGuard::acquire(&flag).is_some());
}

#[tokio::test]
async fn login_reports_in_flight_when_guard_held() {
    let client = AuthClient::new(&ClientConfig::default()).unwrap();
    let creds = Credentials::new("alice", "secret").unwrap();
    let _held = InFlightGuard::acquire(&client.in_flight).unwrap();

    let err = client.login(&creds).await.unwrap_err();
    assert!(matches!(err, AuthError::InFlight));
}
