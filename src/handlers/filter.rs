//! # Secondary channel filters.
//!
//! A handler may carry a [`ChannelFilter`] in addition to its level threshold. The
//! dispatcher consults it after the level check and skips the handler when it returns
//! `false` for the channel name. Filters get their own [`Context`], independent of
//! the handler's.

use super::context::Context;

/// Predicate over channel names.
///
/// Implement it on a type to keep state between calls; plain closures go through
/// [`HandlerSpec::with_filter`](crate::HandlerSpec::with_filter).
pub trait ChannelFilter: Send + Sync + 'static {
    /// Returns `true` if the handler should receive events on `channel`.
    fn accept(&self, channel: &str, context: &Context) -> bool;
}

/// Closure-backed filter.
pub struct FnFilter<F> {
    f: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&str, &Context) -> bool + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ChannelFilter for FnFilter<F>
where
    F: Fn(&str, &Context) -> bool + Send + Sync + 'static,
{
    fn accept(&self, channel: &str, context: &Context) -> bool {
        (self.f)(channel, context)
    }
}

/// Accepts only channels whose name starts with a fixed prefix.
#[derive(Debug, Clone)]
pub struct PrefixFilter {
    prefix: String,
}

impl PrefixFilter {
    /// Creates a filter for `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ChannelFilter for PrefixFilter {
    fn accept(&self, channel: &str, _context: &Context) -> bool {
        channel.starts_with(&self.prefix)
    }
}
