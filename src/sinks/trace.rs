//! # TracingHandler: routed events into `tracing`.
//!
//! Forwards every event it receives to the `tracing` macro matching its level,
//! with the channel and timestamp as structured fields.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO tagrouter::sinks::trace: System started channel="CORE" ts=1
//! WARN tagrouter::sinks::trace: slot B invalid channel="OTA" ts=2
//! ```

use crate::events::{LogEvent, LogLevel};
use crate::handlers::{Context, Handler};

/// Handler that re-emits routed events as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHandler;

impl TracingHandler {
    /// Construct a new [`TracingHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Handler for TracingHandler {
    fn on_log(&self, e: &LogEvent<'_>, _ctx: &Context) {
        match e.level {
            LogLevel::Trace => {
                ::tracing::trace!(channel = e.channel, ts = e.timestamp, "{}", e.message);
            }
            LogLevel::Debug => {
                ::tracing::debug!(channel = e.channel, ts = e.timestamp, "{}", e.message);
            }
            LogLevel::Info => {
                ::tracing::info!(channel = e.channel, ts = e.timestamp, "{}", e.message);
            }
            LogLevel::Warn => {
                ::tracing::warn!(channel = e.channel, ts = e.timestamp, "{}", e.message);
            }
            LogLevel::Error => {
                ::tracing::error!(channel = e.channel, ts = e.timestamp, "{}", e.message);
            }
        }
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerSpec, Logger};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_forwards_message_and_channel() {
        let mut logger = Logger::default();
        logger
            .registry_mut()
            .unwrap()
            .register(HandlerSpec::new(LogLevel::Info, TracingHandler::new()).on("OTA"))
            .unwrap();

        assert_eq!(logger.log_at(LogLevel::Warn, "OTA", "slot B invalid", 77), 1);
        assert!(logs_contain("slot B invalid"));
        assert!(logs_contain("channel=\"OTA\""));
        assert!(logs_contain("ts=77"));
    }

    #[traced_test]
    #[test]
    fn test_threshold_applies_before_forwarding() {
        let mut logger = Logger::default();
        logger
            .registry_mut()
            .unwrap()
            .register(HandlerSpec::new(LogLevel::Error, TracingHandler).on("CORE"))
            .unwrap();

        assert_eq!(logger.log(LogLevel::Info, "CORE", "quiet boot"), 0);
        assert!(!logs_contain("quiet boot"));
    }
}
