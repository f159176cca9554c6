//! # Handler registry and per-channel subscription index.
//!
//! ## Architecture
//! ```text
//! register(spec) ──► Registry ──► slot table (records, fixed)
//!                        │
//!                        └──► subscriptions::subscribe ──► Channel "CORE" [refs]
//!                                                        └► Channel "OTA"  [refs]
//!
//! delete(id)     ──► subscriptions::unsubscribe (recorded channels only)
//!                ──► slot freed, order compacted
//!
//! clear()        ──► subscriptions::prune_all ──► every slot freed
//! ```
//!
//! Channel lists hold `(slot, id)` handles rather than addresses, so removing one
//! record can never invalidate another record's back-references.

mod channel;
mod handle;
mod record;
#[allow(clippy::module_inception)]
mod registry;
mod subscriptions;

pub use channel::Channel;
pub use handle::{ChannelId, HandlerId};
pub use record::{HandlerRecord, HandlerSpec};
pub use registry::{HandlerList, Registration, Registry, RegistryStats};
pub use subscriptions::{SkipReason, SkippedChannel};
