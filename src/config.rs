//! # Router configuration.
//!
//! [`RouterConfig`] fixes every capacity of a [`Registry`](crate::Registry) at
//! construction. All storage is allocated once from these numbers and never grows.
//!
//! ## Sentinel values
//! - any capacity of `0` is treated as `1` (use the accessors, not the raw fields)
//! - `start_sequence = 0` is treated as `1`, since `0` means "no timestamp"
//!
//! # Example
//! ```
//! use tagrouter::{Registry, RouterConfig};
//!
//! let mut cfg = RouterConfig::default();
//! cfg.max_handlers = 4;
//! cfg.max_subscribers = 2;
//!
//! let registry = Registry::new(cfg);
//! assert_eq!(registry.capacity(), 4);
//! ```

/// Capacities and counters for one registry / logger pair.
///
/// ## Field semantics
/// - `max_handlers`: handler slots in the registry (registration fails when all are taken)
/// - `max_subscribers`: subscriber list length of every channel (saturated channels are skipped)
/// - `max_channels`: number of distinct channel names the registry can declare
/// - `start_sequence`: first value of the fallback timestamp sequence
///
/// Memory grows with `max_channels * max_subscribers`, so raise both with care.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    /// Maximum number of registered handlers.
    pub max_handlers: usize,
    /// Maximum number of subscribers per channel.
    pub max_subscribers: usize,
    /// Maximum number of declared channels.
    pub max_channels: usize,
    /// First value handed out by the fallback sequence counter.
    pub start_sequence: u64,
}

impl RouterConfig {
    /// Handler capacity, at least 1.
    pub fn handler_capacity(&self) -> usize {
        self.max_handlers.max(1)
    }

    /// Per-channel subscriber capacity, at least 1.
    pub fn subscriber_capacity(&self) -> usize {
        self.max_subscribers.max(1)
    }

    /// Channel table capacity, at least 1.
    pub fn channel_capacity(&self) -> usize {
        self.max_channels.max(1)
    }

    /// First sequence value, never 0.
    pub fn first_sequence(&self) -> u64 {
        self.start_sequence.max(1)
    }
}

impl Default for RouterConfig {
    /// Provides a default configuration sized for small targets:
    /// - `max_handlers = 6`
    /// - `max_subscribers = 12`
    /// - `max_channels = 16`
    /// - `start_sequence = 1`
    fn default() -> Self {
        Self {
            max_handlers: 6,
            max_subscribers: 12,
            max_channels: 16,
            start_sequence: 1,
        }
    }
}
