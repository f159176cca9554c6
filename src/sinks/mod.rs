//! Built-in handlers, each behind its own feature.
//!
//! - `logging`: [`TracingHandler`] re-emits routed events through `tracing`.
//! - `queue`: [`queued`] moves slow destinations behind a bounded queue and a tokio worker.

#[cfg(feature = "queue")]
pub mod queued;
#[cfg(feature = "logging")]
mod trace;

#[cfg(feature = "logging")]
pub use trace::TracingHandler;
