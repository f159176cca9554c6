//! # Handler trait.
//!
//! [`Handler`] is the extension point for log destinations (serial port, file,
//! in-memory buffer, queue, ...). A handler is invoked synchronously, from inside
//! [`Logger::log`](crate::Logger::log), for every event routed to it.
//!
//! ## Rules
//! - Handlers must not block; move slow work behind a queue
//!   (see the `queue` feature).
//! - Handlers must not panic; a panic unwinds through the dispatching caller.
//! - The event borrows caller data; call [`LogEvent::to_owned_event`] to keep it.
//!
//! ## Example
//! ```rust
//! use tagrouter::{Context, Handler, LogEvent};
//!
//! struct Stdout;
//!
//! impl Handler for Stdout {
//!     fn on_log(&self, event: &LogEvent<'_>, _ctx: &Context) {
//!         println!("{event}");
//!     }
//!
//!     fn name(&self) -> &'static str { "stdout" }
//! }
//! ```

use super::context::Context;
use crate::events::LogEvent;

/// Destination for routed log events.
pub trait Handler: Send + Sync + 'static {
    /// Handles one event.
    ///
    /// `context` is the value given at registration ([`Context::none`] if none was).
    fn on_log(&self, event: &LogEvent<'_>, context: &Context);

    /// Human-readable type name used in diagnostics.
    ///
    /// Registration names (used for lookup and deletion) are set separately on
    /// [`HandlerSpec`](crate::HandlerSpec).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed handler.
///
/// Built by [`HandlerSpec::from_fn`](crate::HandlerSpec::from_fn); kept separate from a
/// blanket impl so closure signatures are inferred at the call site.
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&LogEvent<'_>, &Context) + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&LogEvent<'_>, &Context) + Send + Sync + 'static,
{
    fn on_log(&self, event: &LogEvent<'_>, context: &Context) {
        (self.f)(event, context)
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}
