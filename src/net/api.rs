//! HTTP login against the chat server.
//!
//! ERROR HANDLING
//! ==============
//! Every failure (network, non-2xx, malformed body, empty token) comes back as
//! an [`AuthError`]. Callers treat all of them as "authentication failed"; the
//! variants exist for logs. Nothing is retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Url;

use super::types::{Credentials, LoginResponse, SessionToken};
use crate::config::{ClientConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("a login request is already in flight")]
    InFlight,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("login rejected with HTTP {0}")]
    Status(u16),
    #[error("malformed login response: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("login response carried no token")]
    MissingToken,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Issues login requests. At most one request is in flight at a time.
#[derive(Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    login_url: Url,
    in_flight: AtomicBool,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, login_url: config.login_url()?, in_flight: AtomicBool::new(false) })
    }

    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// `POST` the credentials and extract the session token.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(AuthError::InFlight)?;

        tracing::debug!(url = %self.login_url, username = credentials.username(), "sending login request");
        let response = self
            .http
            .post(self.login_url.clone())
            .json(&credentials.to_request())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: LoginResponse = serde_json::from_str(&body)?;
        parsed
            .token
            .and_then(SessionToken::new)
            .ok_or(AuthError::MissingToken)
    }
}

/// Clears the in-flight flag when the login future completes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
