//! # Handler specifications and stored records.
//!
//! [`HandlerSpec`] describes a handler to register: threshold, callback, contexts,
//! optional filter, optional name and the channels it subscribes to.
//! [`Registry::register`](crate::Registry::register) turns it into a [`HandlerRecord`].
//!
//! ## Example
//! ```rust
//! use tagrouter::{Context, HandlerSpec, LogLevel};
//!
//! let spec = HandlerSpec::from_fn(LogLevel::Info, |ev, _ctx| println!("{ev}"))
//!     .named("serial")
//!     .with_filter(|channel, _| channel != "NOISY", Context::none())
//!     .on("CORE")
//!     .on("OTA");
//!
//! assert_eq!(spec.channels().count(), 2);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::handle::{ChannelId, HandlerId};
use crate::events::{LogEvent, LogLevel};
use crate::handlers::{ChannelFilter, Context, FnFilter, FnHandler, Handler};

/// Filter together with its own context.
#[derive(Clone)]
pub(crate) struct FilterEntry {
    pub(crate) filter: Arc<dyn ChannelFilter>,
    pub(crate) context: Context,
}

/// Description of a handler to register.
#[derive(Clone)]
pub struct HandlerSpec {
    pub(crate) level: LogLevel,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) context: Context,
    pub(crate) filter: Option<FilterEntry>,
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) channels: Vec<Cow<'static, str>>,
    pub(crate) enabled: bool,
}

impl HandlerSpec {
    /// Creates a spec for `handler` receiving events at `level` or above.
    pub fn new(level: LogLevel, handler: impl Handler) -> Self {
        Self::from_arc(level, Arc::new(handler))
    }

    /// Creates a spec from an already shared handler.
    pub fn from_arc(level: LogLevel, handler: Arc<dyn Handler>) -> Self {
        Self {
            level,
            handler,
            context: Context::none(),
            filter: None,
            name: None,
            channels: Vec::new(),
            enabled: true,
        }
    }

    /// Creates a spec from a closure.
    pub fn from_fn<F>(level: LogLevel, f: F) -> Self
    where
        F: Fn(&LogEvent<'_>, &Context) + Send + Sync + 'static,
    {
        Self::new(level, FnHandler::new(f))
    }

    /// Sets the registration name used by [`find_by_name`](crate::Registry::find_by_name)
    /// and [`delete_by_name`](crate::Registry::delete_by_name). Names need not be unique.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the context passed to the handler on every call.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Adds a closure filter over channel names, with its own context.
    pub fn with_filter<F>(self, f: F, context: Context) -> Self
    where
        F: Fn(&str, &Context) -> bool + Send + Sync + 'static,
    {
        self.with_channel_filter(FnFilter::new(f), context)
    }

    /// Adds a filter object, with its own context.
    pub fn with_channel_filter(mut self, filter: impl ChannelFilter, context: Context) -> Self {
        self.filter = Some(FilterEntry {
            filter: Arc::new(filter),
            context,
        });
        self
    }

    /// Subscribes to `channel` (declared on registration if needed).
    pub fn on(mut self, channel: impl Into<Cow<'static, str>>) -> Self {
        self.channels.push(channel.into());
        self
    }

    /// Subscribes to every channel in `channels`.
    pub fn on_all<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.channels.extend(channels.into_iter().map(Into::into));
        self
    }

    /// Registers the handler in the disabled state.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Channels requested so far, in order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.as_ref())
    }
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("level", &self.level)
            .field("handler", &self.handler.name())
            .field("name", &self.name)
            .field("channels", &self.channels)
            .field("filtered", &self.filter.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A registered handler, as stored by the registry.
///
/// Only readable from outside; the registry is the single writer so that the
/// subscription list always matches the channels' back-references.
pub struct HandlerRecord {
    pub(crate) id: HandlerId,
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) level: LogLevel,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) context: Context,
    pub(crate) filter: Option<FilterEntry>,
    pub(crate) enabled: bool,
    /// Channels that hold a back-reference to this record.
    pub(crate) channels: Vec<ChannelId>,
}

impl HandlerRecord {
    /// Unique id.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Registration name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Minimum level delivered to this handler.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether the handler currently receives events.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a secondary channel filter is installed.
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// The handler's context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Channels this handler is actually subscribed to.
    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    /// Applies the enabled flag, threshold and filter for one event.
    pub(crate) fn accepts(&self, level: LogLevel, channel: &str) -> bool {
        if !self.enabled || !level.passes(self.level) {
            return false;
        }
        match &self.filter {
            Some(entry) => entry.filter.accept(channel, &entry.context),
            None => true,
        }
    }

    pub(crate) fn deliver(&self, event: &LogEvent<'_>) {
        self.handler.on_log(event, &self.context);
    }
}

impl fmt::Debug for HandlerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("level", &self.level)
            .field("handler", &self.handler.name())
            .field("enabled", &self.enabled)
            .field("filtered", &self.filter.is_some())
            .field("channels", &self.channels)
            .finish()
    }
}
