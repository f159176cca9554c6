//! # Logger: synchronous dispatch over a bound registry.
//!
//! [`Logger`] owns (optionally) a [`Registry`] plus the timestamp state, and routes
//! each call to the subscribers of exactly one channel.
//!
//! ## Dispatch
//! ```text
//! log(level, "OTA", msg, ts)
//!   ├─ no registry bound         → 0 (no-op)
//!   ├─ "OTA" unknown or empty    → 0 (no-op, sequence untouched)
//!   ├─ timestamp = explicit | provider() | sequence++
//!   └─ for each subscriber of "OTA" (registration order):
//!        disabled | level < threshold | filter("OTA") == false → skip
//!        otherwise                                              → on_log(&event, &ctx)
//! ```
//!
//! ## Rules
//! - Synchronous and best-effort once: no buffering, no retry.
//! - Handlers of other channels are never looked at.
//! - The return value is the number of handlers invoked.
//!
//! ## Threads
//! No internal locking. `Logger` is `Send + Sync`; share it across threads behind one
//! lock (e.g. `Mutex<Logger>`) so each mutation or dispatch is a single critical section.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tagrouter::{HandlerSpec, LogLevel, Logger, Registry};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut registry = Registry::default();
//! registry
//!     .register(
//!         HandlerSpec::from_fn(LogLevel::Info, move |ev, _| {
//!             sink.lock().unwrap().push(ev.to_string());
//!         })
//!         .on("CORE"),
//!     )
//!     .unwrap();
//!
//! let logger = Logger::new(registry);
//! assert_eq!(logger.log(LogLevel::Info, "CORE", "System started"), 1);
//! assert_eq!(logger.log(LogLevel::Debug, "CORE", "ignored"), 0);
//! assert_eq!(seen.lock().unwrap().as_slice(), ["[INFO] CORE: System started"]);
//! ```

use std::fmt;

use super::clock::{Clock, TimestampFn};
use super::format::{ScratchBuffer, FORMAT_CAPACITY};
use crate::config::RouterConfig;
use crate::events::{LogEvent, LogLevel};
use crate::registry::{Channel, ChannelId, Registry};

/// Dispatcher bound to at most one registry.
pub struct Logger {
    registry: Option<Registry>,
    clock: Clock,
}

impl Logger {
    /// Creates a logger dispatching over `registry`.
    pub fn new(registry: Registry) -> Self {
        let clock = Clock::new(registry.config().first_sequence());
        Self {
            registry: Some(registry),
            clock,
        }
    }

    /// Creates a logger over a fresh registry built from `config`.
    pub fn with_config(config: RouterConfig) -> Self {
        Self::new(Registry::new(config))
    }

    /// Creates a logger without a registry; every dispatch is a no-op until
    /// [`bind`](Self::bind) is called.
    pub fn unbound() -> Self {
        Self {
            registry: None,
            clock: Clock::new(RouterConfig::default().first_sequence()),
        }
    }

    /// Attaches `registry`, returning the previously bound one.
    pub fn bind(&mut self, registry: Registry) -> Option<Registry> {
        self.registry.replace(registry)
    }

    /// Detaches and returns the bound registry.
    pub fn unbind(&mut self) -> Option<Registry> {
        self.registry.take()
    }

    /// Returns `true` if a registry is bound.
    pub fn is_bound(&self) -> bool {
        self.registry.is_some()
    }

    /// The bound registry.
    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    /// The bound registry, for registration and deletion.
    pub fn registry_mut(&mut self) -> Option<&mut Registry> {
        self.registry.as_mut()
    }

    /// Installs a timestamp provider, used whenever no explicit timestamp is given.
    pub fn set_timestamp_provider<F>(&mut self, provider: F)
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.clock.set_provider(Box::new(provider));
    }

    /// Installs an already boxed provider.
    pub fn set_boxed_timestamp_provider(&mut self, provider: Box<TimestampFn>) {
        self.clock.set_provider(provider);
    }

    /// Removes the provider; the sequence counter takes over. Returns whether one was set.
    pub fn clear_timestamp_provider(&mut self) -> bool {
        self.clock.clear_provider()
    }

    /// Value the fallback sequence will assign to the next event that needs it.
    pub fn next_sequence(&self) -> u64 {
        self.clock.peek_sequence()
    }

    /// Dispatches `message` on `channel` with an automatic timestamp.
    pub fn log(&self, level: LogLevel, channel: &str, message: &str) -> usize {
        self.log_at(level, channel, message, 0)
    }

    /// Dispatches `message` on `channel`; a non-zero `timestamp` is used as is.
    pub fn log_at(&self, level: LogLevel, channel: &str, message: &str, timestamp: u64) -> usize {
        let Some(registry) = &self.registry else {
            return 0;
        };
        let Some(channel) = registry
            .channel_id(channel)
            .and_then(|id| registry.channel(id))
        else {
            return 0;
        };
        self.dispatch(registry, channel, level, message, timestamp)
    }

    /// Dispatches on a channel addressed by id, skipping the name lookup.
    pub fn log_channel(
        &self,
        level: LogLevel,
        channel: ChannelId,
        message: &str,
        timestamp: u64,
    ) -> usize {
        let Some(registry) = &self.registry else {
            return 0;
        };
        match registry.channel(channel) {
            Some(channel) => self.dispatch(registry, channel, level, message, timestamp),
            None => 0,
        }
    }

    /// Formats `args` into a bounded stack buffer, then dispatches like [`log`](Self::log).
    ///
    /// Output longer than [`FORMAT_CAPACITY`] bytes is truncated.
    ///
    /// ```rust
    /// # use tagrouter::{Logger, LogLevel};
    /// let logger = Logger::unbound();
    /// assert_eq!(logger.log_fmt(LogLevel::Info, "WIFI", format_args!("rssi={}", -61)), 0);
    /// ```
    pub fn log_fmt(&self, level: LogLevel, channel: &str, args: fmt::Arguments<'_>) -> usize {
        if !self.is_bound() {
            return 0;
        }
        let scratch = ScratchBuffer::<FORMAT_CAPACITY>::format(args);
        if scratch.is_truncated() {
            tracing::trace!(channel, capacity = FORMAT_CAPACITY, "formatted message truncated");
        }
        self.log_at(level, channel, scratch.as_str(), 0)
    }

    fn dispatch(
        &self,
        registry: &Registry,
        channel: &Channel,
        level: LogLevel,
        message: &str,
        timestamp: u64,
    ) -> usize {
        if channel.is_empty() {
            return 0;
        }

        let event = LogEvent::new(level, channel.name(), message, self.clock.resolve(timestamp));

        let mut delivered = 0;
        for record in registry.subscribers(channel) {
            if !record.accepts(level, channel.name()) {
                continue;
            }
            record.deliver(&event);
            delivered += 1;
        }

        tracing::trace!(
            channel = channel.name(),
            level = %level,
            timestamp = event.timestamp,
            delivered,
            "event dispatched"
        );
        delivered
    }
}

impl Default for Logger {
    /// A logger over a default-sized registry.
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("registry", &self.registry)
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Context, PrefixFilter};
    use crate::registry::HandlerSpec;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<String>>>;

    fn recorder(level: LogLevel, tag: &'static str, seen: &Seen) -> HandlerSpec {
        let seen = Arc::clone(seen);
        HandlerSpec::from_fn(level, move |ev, _| {
            seen.lock().unwrap().push(format!("{tag}:{}:{}", ev.channel, ev.message));
        })
    }

    fn take(seen: &Seen) -> Vec<String> {
        std::mem::take(&mut *seen.lock().unwrap())
    }

    #[test]
    fn test_unbound_logger_is_noop() {
        let logger = Logger::unbound();
        assert!(!logger.is_bound());
        assert_eq!(logger.log(LogLevel::Error, "CORE", "nobody listens"), 0);
        assert_eq!(logger.next_sequence(), 1);
    }

    #[test]
    fn test_bind_enables_dispatch() {
        let seen = Seen::default();
        let mut registry = Registry::default();
        registry.register(recorder(LogLevel::Info, "a", &seen).on("CORE")).unwrap();

        let mut logger = Logger::unbound();
        assert!(logger.bind(registry).is_none());
        assert_eq!(logger.log(LogLevel::Info, "CORE", "up"), 1);

        let registry = logger.unbind().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(logger.log(LogLevel::Info, "CORE", "down"), 0);
        assert_eq!(take(&seen), vec!["a:CORE:up"]);
    }

    #[test]
    fn test_routes_only_to_channel_subscribers() {
        let seen = Seen::default();
        let mut logger = Logger::default();
        let registry = logger.registry_mut().unwrap();
        registry.register(recorder(LogLevel::Info, "A", &seen).on("CORE")).unwrap();
        registry.register(recorder(LogLevel::Info, "B", &seen).on("OTA")).unwrap();

        assert_eq!(logger.log(LogLevel::Info, "CORE", "boot"), 1);
        assert_eq!(take(&seen), vec!["A:CORE:boot"]);

        assert_eq!(logger.log(LogLevel::Info, "OTA", "flash"), 1);
        assert_eq!(take(&seen), vec!["B:OTA:flash"]);

        assert_eq!(logger.log(LogLevel::Debug, "CORE", "noise"), 0);
        assert!(take(&seen).is_empty());
    }

    #[test]
    fn test_delivery_order_is_registration_order() {
        let seen = Seen::default();
        let mut logger = Logger::default();
        let registry = logger.registry_mut().unwrap();
        for tag in ["first", "second", "third"] {
            registry.register(recorder(LogLevel::Trace, tag, &seen).on("X")).unwrap();
        }

        logger.log(LogLevel::Warn, "X", "m");
        assert_eq!(take(&seen), vec!["first:X:m", "second:X:m", "third:X:m"]);
    }

    #[test]
    fn test_disabled_and_filtered_handlers_are_skipped() {
        let seen = Seen::default();
        let mut logger = Logger::default();
        let registry = logger.registry_mut().unwrap();
        let off = registry.register(recorder(LogLevel::Info, "off", &seen).on("NET.WIFI")).unwrap();
        registry.disable(off.id());
        registry
            .register(
                recorder(LogLevel::Info, "core-only", &seen)
                    .with_channel_filter(PrefixFilter::new("CORE"), Context::none())
                    .on("NET.WIFI"),
            )
            .unwrap();
        registry.register(recorder(LogLevel::Info, "all", &seen).on("NET.WIFI")).unwrap();

        assert_eq!(logger.log(LogLevel::Info, "NET.WIFI", "joined"), 1);
        assert_eq!(take(&seen), vec!["all:NET.WIFI:joined"]);

        logger.registry_mut().unwrap().enable(off.id());
        assert_eq!(logger.log(LogLevel::Info, "NET.WIFI", "again"), 2);
    }

    #[test]
    fn test_handler_receives_its_context() {
        let mut logger = Logger::default();
        let buffer = Arc::new(Mutex::new(String::new()));
        logger
            .registry_mut()
            .unwrap()
            .register(
                HandlerSpec::from_fn(LogLevel::Info, |ev, ctx| {
                    if let Some(out) = ctx.downcast_ref::<Mutex<String>>() {
                        out.lock().unwrap().push_str(&ev.to_string());
                    }
                })
                .with_context(Context::from_arc(Arc::clone(&buffer)))
                .on("SERIAL"),
            )
            .unwrap();

        logger.log(LogLevel::Info, "SERIAL", "Logged to stream");
        assert_eq!(buffer.lock().unwrap().as_str(), "[INFO] SERIAL: Logged to stream");
    }

    #[test]
    fn test_timestamp_precedence() {
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::default();
        let sink = Arc::clone(&stamps);
        logger
            .registry_mut()
            .unwrap()
            .register(
                HandlerSpec::from_fn(LogLevel::Info, move |ev, _| {
                    sink.lock().unwrap().push(ev.timestamp);
                })
                .on("TS"),
            )
            .unwrap();

        logger.log(LogLevel::Info, "TS", "seq");
        logger.log(LogLevel::Info, "TS", "seq");
        logger.set_timestamp_provider(|| 555);
        logger.log(LogLevel::Info, "TS", "provider");
        logger.log_at(LogLevel::Info, "TS", "explicit", 987_654_321);
        assert!(logger.clear_timestamp_provider());
        logger.log(LogLevel::Info, "TS", "seq again");

        assert_eq!(*stamps.lock().unwrap(), vec![1, 2, 555, 987_654_321, 3]);
    }

    #[test]
    fn test_empty_channel_does_not_advance_sequence() {
        let mut logger = Logger::default();
        logger.registry_mut().unwrap().declare_channel("QUIET").unwrap();
        assert_eq!(logger.log(LogLevel::Error, "QUIET", "x"), 0);
        assert_eq!(logger.log(LogLevel::Error, "UNKNOWN", "x"), 0);
        assert_eq!(logger.next_sequence(), 1);
    }

    #[test]
    fn test_sequence_starts_at_configured_value() {
        let logger = Logger::with_config(RouterConfig {
            start_sequence: 100,
            ..RouterConfig::default()
        });
        assert_eq!(logger.next_sequence(), 100);
    }

    #[test]
    fn test_log_channel_by_id() {
        let seen = Seen::default();
        let mut logger = Logger::default();
        let registry = logger.registry_mut().unwrap();
        registry.register(recorder(LogLevel::Info, "a", &seen).on("CORE")).unwrap();
        let core = registry.channel_id("CORE").unwrap();

        assert_eq!(logger.log_channel(LogLevel::Info, core, "fast", 0), 1);
        assert_eq!(logger.log_channel(LogLevel::Info, ChannelId(9), "nowhere", 0), 0);
        assert_eq!(take(&seen), vec!["a:CORE:fast"]);
    }

    #[test]
    fn test_log_fmt_formats_and_truncates() {
        let seen = Seen::default();
        let mut logger = Logger::default();
        logger
            .registry_mut()
            .unwrap()
            .register(recorder(LogLevel::Info, "f", &seen).on("WIFI"))
            .unwrap();

        logger.log_fmt(LogLevel::Info, "WIFI", format_args!("rssi={} ch={}", -61, 6));
        assert_eq!(take(&seen), vec!["f:WIFI:rssi=-61 ch=6"]);

        let long = "x".repeat(FORMAT_CAPACITY + 10);
        logger.log_fmt(LogLevel::Info, "WIFI", format_args!("{long}"));
        let got = take(&seen);
        assert_eq!(got[0].len(), "f:WIFI:".len() + FORMAT_CAPACITY);
    }
}
