//! # Severity levels.
//!
//! Levels are totally ordered `Trace < Debug < Info < Warn < Error`. A handler
//! registered at threshold `T` receives an event at level `L` iff `L >= T`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLevel {
    /// Extremely fine-grained diagnostics.
    Trace = 0,
    /// Details useful while developing.
    Debug = 1,
    /// General informational messages.
    #[default]
    Info = 2,
    /// Potential issues or recoverable problems.
    Warn = 3,
    /// Serious issues requiring attention.
    Error = 4,
}

impl LogLevel {
    /// All levels, lowest first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Upper-case name of the level (`"TRACE"` .. `"ERROR"`).
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Numeric value of the level.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if an event at `self` passes a handler threshold of `threshold`.
    pub fn passes(self, threshold: LogLevel) -> bool {
        self >= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string or number does not name a [`LogLevel`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    /// Case-insensitive; accepts `ERR` and `WARNING` as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ParseLevelError;

    fn try_from(value: u8) -> Result<Self, ParseLevelError> {
        LogLevel::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| ParseLevelError(value.to_string()))
    }
}
