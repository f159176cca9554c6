//! Log event data model: severity levels and the event value passed to handlers.
//!
//! ## Contents
//! - [`LogLevel`] totally ordered severity with string/number conversions
//! - [`LogEvent`] borrowed per-dispatch event
//! - [`OwnedLogEvent`] deep copy for queuing or sending across threads

mod event;
mod level;

pub use event::{LogEvent, OwnedLogEvent};
pub use level::{LogLevel, ParseLevelError};
