//! Client configuration parsed from environment variables.
//!
//! One configurable client replaces per-deployment copies: the server
//! host/port, TLS, login path and input trimming are all knobs here. CLI flags
//! override these values in `main.rs`.

use std::path::PathBuf;

use reqwest::Url;

use crate::net::types::SessionToken;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8082;
pub const DEFAULT_LOGIN_PATH: &str = "/login-or-register";
pub const DEFAULT_STORAGE_PATH: &str = ".chatroom/storage.json";
pub const DEFAULT_HISTORY_LIMIT: usize = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub login_path: String,
    pub trim_input: bool,
    pub storage_path: PathBuf,
    pub history_limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            tls: false,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            trim_input: true,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CHATROOM_HOST`: default `127.0.0.1`
    /// - `CHATROOM_PORT`: default `8082`
    /// - `CHATROOM_TLS`: use `https`/`wss` when true
    /// - `CHATROOM_LOGIN_PATH`: default `/login-or-register`
    /// - `CHATROOM_TRIM_INPUT`: default true
    /// - `CHATROOM_STORAGE_PATH`: default `.chatroom/storage.json`
    /// - `CHATROOM_HISTORY_LIMIT`: default 500
    /// - `CHATROOM_REQUEST_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("CHATROOM_HOST")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.host);
        let login_path = lookup("CHATROOM_LOGIN_PATH")
            .map(|v| normalize_path(&v))
            .unwrap_or(defaults.login_path);
        let storage_path = lookup("CHATROOM_STORAGE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.storage_path, PathBuf::from);

        Ok(Self {
            host,
            port: parse_var(&lookup, "CHATROOM_PORT", defaults.port)?,
            tls: parse_bool(&lookup, "CHATROOM_TLS", defaults.tls)?,
            login_path,
            trim_input: parse_bool(&lookup, "CHATROOM_TRIM_INPUT", defaults.trim_input)?,
            storage_path,
            history_limit: parse_var(&lookup, "CHATROOM_HISTORY_LIMIT", defaults.history_limit)?,
            request_timeout_secs: parse_var(&lookup, "CHATROOM_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
        })
    }

    /// Base `http(s)://host:port` for REST calls.
    #[must_use]
    pub fn http_base(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Absolute login endpoint URL.
    pub fn login_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}{}", self.http_base(), self.login_path);
        Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw))
    }

    /// Real-time endpoint URL with the session token as a query parameter.
    pub fn ws_url(&self, token: &SessionToken) -> Result<Url, ConfigError> {
        let scheme = if self.tls { "wss" } else { "ws" };
        let raw = format!("{scheme}://{}:{}/ws", self.host, self.port);
        let mut url = Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw))?;
        url.query_pairs_mut().append_pair("token", token.as_str());
        Ok(url)
    }
}

/// Trim a login path and give it a leading `/`.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
