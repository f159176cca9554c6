//! # tagrouter
//!
//! **tagrouter** is a small, fixed-capacity log-routing core.
//!
//! Handlers subscribe to named channels ("tags" such as `CORE`, `OTA`, `NET.WIFI`).
//! A log call names one channel and is delivered only to that channel's subscribers
//! whose level threshold, enabled flag and optional channel filter accept it.
//! All tables are sized at construction and never grow. The dispatch path itself
//! never allocates; registration allocates only the new record's channel list, bounded by `max_channels`.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ HandlerSpec  │   │ HandlerSpec  │   │ HandlerSpec  │
//!     │ (serial, ≥I) │   │ (file, ≥W)   │   │ (queue, ≥D)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry (fixed capacity)                                        │
//! │  - slot table of HandlerRecords (id, level, context, filter)      │
//! │  - channel table, one bounded subscriber list per channel         │
//! │  - subscription maintainer (subscribe / unsubscribe / prune_all)  │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   "CORE" [h1, h3]    "OTA" [h2, h3]    "NET.WIFI" [h1]
//!        ▲
//!        │ log(Info, "CORE", "System started")
//! ┌──────┴────────────────────────────────────────────────────────────┐
//! │  Logger                                                           │
//! │  - timestamp: explicit ─► provider ─► sequence                    │
//! │  - walk the channel's subscribers in registration order           │
//! │  - enabled? level ≥ threshold? filter(channel)? ─► on_log         │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(spec) ──► id assigned (never reused) ──► channels declared ──► subscribed
//!                                                         └─ full ─► Registration::skipped
//! delete_by_id / delete_by_name ──► unsubscribed from its channels ──► slot freed
//! clear() ──► every channel pruned ──► every slot freed (ids keep counting)
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                         |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Handlers**      | Destinations for routed events, with an opaque context.     | [`Handler`], [`Context`], [`HandlerSpec`]  |
//! | **Filters**       | Per-handler predicate over channel names.                   | [`ChannelFilter`], [`PrefixFilter`]        |
//! | **Registry**      | Fixed-capacity handler table and channel subscriber lists.  | [`Registry`], [`Channel`], [`HandlerId`]   |
//! | **Dispatch**      | Synchronous delivery with timestamp precedence.             | [`Logger`], [`LogEvent`], [`LogLevel`]     |
//! | **Errors**        | Typed registration errors and partial-failure reports.      | [`RegistryError`], [`SkippedChannel`]      |
//! | **Configuration** | Capacities and the first sequence number.                   | [`RouterConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports [`TracingHandler`], which re-emits routed events through `tracing`.
//! - `queue`: exports [`queued`], a bounded tokio queue in front of an async [`Sink`].
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tagrouter::{Context, HandlerSpec, LogLevel, Logger, RouterConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut logger = Logger::with_config(RouterConfig::default());
//!     let lines = Arc::new(Mutex::new(Vec::<String>::new()));
//!
//!     let registry = logger.registry_mut().ok_or("logger is unbound")?;
//!     registry.register(
//!         HandlerSpec::from_fn(LogLevel::Info, |ev, ctx| {
//!             if let Some(out) = ctx.downcast_ref::<Mutex<Vec<String>>>() {
//!                 out.lock().unwrap().push(ev.to_string());
//!             }
//!         })
//!         .named("serial")
//!         .with_context(Context::from_arc(Arc::clone(&lines)))
//!         .on("CORE")
//!         .on("OTA"),
//!     )?;
//!
//!     logger.log(LogLevel::Info, "CORE", "System started");
//!     logger.log(LogLevel::Debug, "OTA", "below threshold");
//!     logger.log(LogLevel::Info, "NET", "nobody subscribed");
//!
//!     assert_eq!(*lines.lock().unwrap(), vec!["[INFO] CORE: System started"]);
//!     Ok(())
//! }
//! ```
mod config;
mod dispatch;
mod error;
mod events;
mod handlers;
mod registry;
mod sinks;

// ---- Public re-exports ----

pub use config::RouterConfig;
pub use dispatch::{Logger, TimestampFn, FORMAT_CAPACITY};
pub use error::RegistryError;
pub use events::{LogEvent, LogLevel, OwnedLogEvent, ParseLevelError};
pub use handlers::{ChannelFilter, Context, FnFilter, FnHandler, Handler, PrefixFilter};
pub use registry::{
    Channel, ChannelId, HandlerId, HandlerList, HandlerRecord, HandlerSpec, Registration,
    Registry, RegistryStats, SkipReason, SkippedChannel,
};

// Optional: re-emit routed events through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sinks::TracingHandler;

// Optional: bounded queue + tokio worker in front of async sinks.
// Enable with: `--features queue`
#[cfg(feature = "queue")]
pub use sinks::queued;
#[cfg(feature = "queue")]
pub use sinks::queued::{QueueHandler, Sink, SinkStats, SinkWorker};
