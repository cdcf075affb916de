//! Wire types shared by the login call and the real-time channel.
//!
//! Login: `POST {login_path}` with [`LoginRequest`], answered by
//! [`LoginResponse`]. Real-time: one [`ChatMessage`] JSON object per text
//! frame, identical in both directions.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 24;
pub const PASSWORD_MIN_CHARS: usize = 3;
pub const PASSWORD_MAX_CHARS: usize = 25;

// =============================================================================
// CREDENTIALS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialField {
    Username,
    Password,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Password => f.write_str("password"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be {min}-{max} characters (got {len})")]
pub struct ValidationError {
    pub field: CredentialField,
    pub len: usize,
    pub min: usize,
    pub max: usize,
}

/// Username/password pair, validated at construction.
///
/// Both fields are trimmed before their length is checked. Lengths count
/// chars, not bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        let password = password.trim();
        check_len(CredentialField::Username, username, USERNAME_MIN_CHARS, USERNAME_MAX_CHARS)?;
        check_len(CredentialField::Password, password, PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS)?;
        Ok(Self { username: username.to_owned(), password: password.to_owned() })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn to_request(&self) -> LoginRequest<'_> {
        LoginRequest { username: &self.username, password: &self.password }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn check_len(field: CredentialField, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError { field, len, min, max })
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Opaque access token issued by the login endpoint. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for an empty token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({} chars)", self.0.chars().count())
    }
}

// =============================================================================
// CHAT MESSAGE
// =============================================================================

/// A single chat message as carried on the real-time channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    /// Epoch milliseconds.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
}

impl ChatMessage {
    #[must_use]
    pub fn new(text: impl Into<String>, timestamp: i64) -> Self {
        Self { text: text.into(), timestamp }
    }

    /// Parse one inbound text frame. Anything that is not a chat message
    /// object yields `None`.
    #[must_use]
    pub fn from_frame(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Accepts integer or numeric-string timestamps; peers have sent both.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        #[allow(clippy::cast_possible_truncation)]
        Raw::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
        Raw::Float(value) => Err(serde::de::Error::custom(format!("non-finite timestamp {value}"))),
        Raw::Text(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric timestamp {value:?}"))),
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
