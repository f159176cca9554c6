//! # Queued delivery to async sinks.
//!
//! [`spawn`] splits a slow destination into two halves:
//! - [`QueueHandler`]: a synchronous [`Handler`] that copies each event and
//!   `try_send`s it into a bounded queue (never blocks the dispatching caller);
//! - [`SinkWorker`]: a tokio task draining the queue into an async [`Sink`].
//!
//! ## Architecture
//! ```text
//! Logger::log ──► QueueHandler::on_log ──► [bounded queue] ──► worker ──► sink.write()
//!                        │                                        └─► panic → counted, next event
//!                        └─► queue full/closed → event dropped, counted
//! ```
//!
//! ## Rules
//! - **Overflow**: the event is dropped for this sink only.
//! - **FIFO**: the sink sees events in dispatch order.
//! - **Panic isolation**: a panicking `write` is caught with `catch_unwind`;
//!   the worker continues with the next event.
//! - **Shutdown**: [`SinkWorker::shutdown`] stops intake, drains what is already
//!   queued and joins the worker.
//!
//! `AssertUnwindSafe` is used, so a sink that panics while holding a lock can leave
//! its own state poisoned.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tagrouter::{queued, HandlerSpec, LogLevel, Logger, OwnedLogEvent, Sink};
//!
//! struct Uart;
//!
//! #[async_trait]
//! impl Sink for Uart {
//!     async fn write(&self, event: &OwnedLogEvent) {
//!         println!("{event}");
//!     }
//!     fn name(&self) -> &'static str { "uart" }
//! }
//!
//! let (handler, worker) = queued::spawn(Arc::new(Uart));
//!
//! let mut logger = Logger::default();
//! logger
//!     .registry_mut()
//!     .unwrap()
//!     .register(HandlerSpec::new(LogLevel::Info, handler).on("CORE"))
//!     .unwrap();
//!
//! logger.log(LogLevel::Info, "CORE", "System started");
//! let stats = worker.shutdown().await;
//! assert_eq!(stats.written, 1);
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{LogEvent, OwnedLogEvent};
use crate::handlers::{Context, Handler};

/// Async destination fed by a [`SinkWorker`].
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Writes one event. Called from the worker task, in FIFO order.
    async fn write(&self, event: &OwnedLogEvent);

    /// Sink name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of the queue in front of this sink (minimum 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}

#[derive(Default)]
struct Counters {
    written: AtomicU64,
    dropped: AtomicU64,
    panicked: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SinkStats {
        SinkStats {
            written: self.written.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

/// Delivery counters of one queued sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Events handed to [`Sink::write`] that returned normally.
    pub written: u64,
    /// Events dropped because the queue was full or closed.
    pub dropped: u64,
    /// Writes that panicked.
    pub panicked: u64,
}

/// Spawns the worker for `sink` and returns the handler feeding it.
///
/// Must be called from within a tokio runtime. The handler is `Clone`; every
/// clone feeds the same queue.
pub fn spawn(sink: Arc<dyn Sink>) -> (QueueHandler, SinkWorker) {
    let name = sink.name();
    let (tx, mut rx) = mpsc::channel::<OwnedLogEvent>(sink.queue_capacity().max(1));
    let counters = Arc::new(Counters::default());
    let token = CancellationToken::new();

    let worker_counters = Arc::clone(&counters);
    let worker_token = token.clone();
    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                maybe = rx.recv() => match maybe {
                    Some(ev) => write_one(sink.as_ref(), &ev, &worker_counters).await,
                    None => break,
                },
                _ = worker_token.cancelled() => {
                    rx.close();
                    while let Some(ev) = rx.recv().await {
                        write_one(sink.as_ref(), &ev, &worker_counters).await;
                    }
                    break;
                }
            }
        }
        tracing::debug!(sink = name, "sink worker stopped");
    });

    let handler = QueueHandler {
        name,
        sender: tx,
        counters: Arc::clone(&counters),
    };
    let worker = SinkWorker {
        name,
        token,
        handle,
        counters,
    };
    (handler, worker)
}

async fn write_one(sink: &dyn Sink, event: &OwnedLogEvent, counters: &Counters) {
    let fut = sink.write(event);
    match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        Ok(()) => {
            counters.written.fetch_add(1, Ordering::Relaxed);
        }
        Err(panic_err) => {
            counters.panicked.fetch_add(1, Ordering::Relaxed);
            let any = &*panic_err;
            let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::warn!(sink = sink.name(), info = %info, "sink panicked");
        }
    }
}

/// Synchronous half of a queued sink; register it like any other handler.
#[derive(Clone)]
pub struct QueueHandler {
    name: &'static str,
    sender: mpsc::Sender<OwnedLogEvent>,
    counters: Arc<Counters>,
}

impl QueueHandler {
    /// Events dropped so far (queue full or worker gone).
    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// Returns `true` once the worker no longer accepts events.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Handler for QueueHandler {
    fn on_log(&self, event: &LogEvent<'_>, _ctx: &Context) {
        let reason = match self.sender.try_send(event.to_owned_event()) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(_)) => "full",
            Err(mpsc::error::TrySendError::Closed(_)) => "closed",
        };
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            sink = self.name,
            channel = event.channel,
            reason,
            "queued sink dropped event"
        );
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for QueueHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueHandler")
            .field("sink", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Asynchronous half of a queued sink: owns the worker task.
pub struct SinkWorker {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl SinkWorker {
    /// Name of the sink being driven.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current counters.
    pub fn stats(&self) -> SinkStats {
        self.counters.snapshot()
    }

    /// Stops intake, writes every event already queued, joins the worker and
    /// returns the final counters.
    pub async fn shutdown(self) -> SinkStats {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(sink = self.name, error = %e, "sink worker join failed");
        }
        self.counters.snapshot()
    }
}

impl std::fmt::Debug for SinkWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkWorker")
            .field("sink", &self.name)
            .field("stats", &self.stats())
            .finish()
    }
}
