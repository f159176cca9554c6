//! Identifiers used across the registry and the channel table.

use std::fmt;

/// Public identity of a registered handler.
///
/// Assigned sequentially from 1 and never reused for the lifetime of a
/// [`Registry`](crate::Registry), not even after deletion or [`clear`](crate::Registry::clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub(crate) u32);

impl HandlerId {
    /// Raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a declared channel in its registry's channel table.
///
/// Only meaningful for the registry that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub(crate) usize);

impl ChannelId {
    /// Position in the channel table (declaration order).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Back-reference stored in a channel's subscriber list.
///
/// `slot` locates the record without a search; `id` tells whether the slot still
/// holds the same logical handler. Slots never move, and ids are never reused, so a
/// stale reference can never resolve to another handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HandlerRef {
    pub(crate) slot: usize,
    pub(crate) id: HandlerId,
}
