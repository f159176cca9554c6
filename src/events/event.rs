//! # Log events handed to handlers.
//!
//! [`LogEvent`] is the zero-copy form built once per dispatch: it borrows the channel
//! name and the message from the caller and lives only for the duration of the call.
//! Handlers that need to keep an event (queues, other threads) convert it with
//! [`LogEvent::to_owned_event`] into an [`OwnedLogEvent`].
//!
//! ## Example
//! ```rust
//! use tagrouter::{LogEvent, LogLevel};
//!
//! let ev = LogEvent::new(LogLevel::Warn, "OTA", "slot B invalid", 42);
//! let owned = ev.to_owned_event();
//!
//! assert_eq!(owned.channel(), "OTA");
//! assert_eq!(owned.as_event(), ev);
//! ```

use std::fmt;
use std::sync::Arc;

use super::level::LogLevel;

/// Borrowed log event, valid for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEvent<'a> {
    /// Severity of the event.
    pub level: LogLevel,
    /// Name of the channel the event was dispatched on.
    pub channel: &'a str,
    /// Already formatted message text.
    pub message: &'a str,
    /// Resolved timestamp: the explicit value, else the provider's output verbatim,
    /// else the next sequence number.
    pub timestamp: u64,
}

impl<'a> LogEvent<'a> {
    /// Creates an event from its parts.
    pub fn new(level: LogLevel, channel: &'a str, message: &'a str, timestamp: u64) -> Self {
        Self {
            level,
            channel,
            message,
            timestamp,
        }
    }

    /// Deep-copies the event so it can outlive the dispatch call.
    pub fn to_owned_event(&self) -> OwnedLogEvent {
        OwnedLogEvent {
            level: self.level,
            channel: Arc::from(self.channel),
            message: Arc::from(self.message),
            timestamp: self.timestamp,
        }
    }
}

impl fmt::Display for LogEvent<'_> {
    /// `[LEVEL] channel: message`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.channel, self.message)
    }
}

/// Owned copy of a [`LogEvent`].
///
/// Cheap to clone (`Arc`-backed strings) and `Send + Sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedLogEvent {
    level: LogLevel,
    channel: Arc<str>,
    message: Arc<str>,
    timestamp: u64,
}

impl OwnedLogEvent {
    /// Severity of the event.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Channel name.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resolved timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Borrows the owned event back as a [`LogEvent`].
    pub fn as_event(&self) -> LogEvent<'_> {
        LogEvent::new(self.level, &self.channel, &self.message, self.timestamp)
    }
}

impl fmt::Display for OwnedLogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_event().fmt(f)
    }
}
