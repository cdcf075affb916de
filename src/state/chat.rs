#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::collections::VecDeque;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::net::types::ChatMessage;

/// Rendered chat history, oldest first, capped at `limit` lines.
#[derive(Clone, Debug)]
pub struct ChatLog {
    lines: VecDeque<String>,
    limit: usize,
}

impl ChatLog {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { lines: VecDeque::new(), limit: limit.max(1) }
    }

    /// Append a line, dropping the oldest once the cap is reached.
    pub fn push(&mut self, line: String) {
        while self.lines.len() >= self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newest line; the view follows it.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Render `"<date time>: <text>"` with the timestamp shown at `offset`.
///
/// Timestamps outside the representable range fall back to raw milliseconds.
#[must_use]
pub fn format_line(message: &ChatMessage, offset: UtcOffset) -> String {
    format!("{}: {}", format_timestamp(message.timestamp, offset), message.text)
}

#[must_use]
pub fn format_timestamp(timestamp_ms: i64, offset: UtcOffset) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp_ms) * 1_000_000)
        .ok()
        .and_then(|at| at.checked_to_offset(offset))
        .and_then(|at| at.format(format).ok())
        .unwrap_or_else(|| format!("@{timestamp_ms}ms"))
}
