//! # Handler-side traits.
//!
//! Everything a user plugs into the router:
//!
//! - [`Handler`] receives routed [`LogEvent`](crate::LogEvent)s
//! - [`ChannelFilter`] optionally narrows which channels a handler accepts
//! - [`Context`] opaque value passed back to a handler or filter untouched
//!
//! ```text
//! Logger::log(level, "OTA", msg)
//!     │
//!     └─► channel "OTA" subscribers (registration order)
//!             ├─ disabled?              → skip
//!             ├─ level < threshold?     → skip
//!             ├─ filter rejects "OTA"?  → skip
//!             └─ handler.on_log(&event, &context)
//! ```

mod context;
mod filter;
mod handler;

pub use context::Context;
pub use filter::{ChannelFilter, FnFilter, PrefixFilter};
pub use handler::{FnHandler, Handler};
