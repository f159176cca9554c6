//! Error types used by the handler registry.
//!
//! Only conditions that refuse a whole registration are errors. Everything else the
//! router can run into is reported without one:
//!
//! - lookups and deletions that match nothing return `None` / `false`;
//! - a channel that cannot take one more subscriber is reported per channel in
//!   [`Registration::skipped`](crate::Registration::skipped);
//! - dispatching through a [`Logger`](crate::Logger) with no registry bound is a no-op.
//!
//! [`RegistryError`] provides `as_label` / `as_message` helpers for logs and metrics.

use thiserror::Error;

/// # Errors produced by the handler registry.
///
/// A returned error means the registry was left exactly as it was before the call.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Every handler slot is taken.
    #[error("handler registry is full ({capacity} handlers)")]
    CapacityExceeded {
        /// The configured maximum number of handlers.
        capacity: usize,
    },

    /// The channel table cannot declare another channel.
    #[error("channel table is full ({capacity} channels)")]
    ChannelTableFull {
        /// The configured maximum number of channels.
        capacity: usize,
    },

    /// The id counter reached its maximum; ids are never reused, so no further
    /// handler can be registered in this registry.
    #[error("handler ids exhausted")]
    IdsExhausted,
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tagrouter::RegistryError;
    ///
    /// let err = RegistryError::CapacityExceeded { capacity: 6 };
    /// assert_eq!(err.as_label(), "registry_capacity_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::CapacityExceeded { .. } => "registry_capacity_exceeded",
            RegistryError::ChannelTableFull { .. } => "registry_channel_table_full",
            RegistryError::IdsExhausted => "registry_ids_exhausted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::CapacityExceeded { capacity } => {
                format!("capacity exceeded: max_handlers={capacity}")
            }
            RegistryError::ChannelTableFull { capacity } => {
                format!("channel table full: max_channels={capacity}")
            }
            RegistryError::IdsExhausted => "handler id space exhausted".to_string(),
        }
    }

    /// Indicates whether the registration may succeed later on the same registry.
    ///
    /// Returns `true` when freeing room (deleting handlers) can help,
    /// `false` for [`RegistryError::IdsExhausted`].
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistryError::CapacityExceeded { .. })
    }
}
