//! # Channels (tags).
//!
//! A [`Channel`] is a named routing key owning a fixed-capacity, ordered list of
//! back-references to its subscribers. The list is allocated once at declaration and
//! only the subscription maintainer mutates it; everything public here is read-only.
//!
//! ## Rules
//! - no handler appears twice in one list
//! - `len() <= capacity()` at all times
//! - order is registration order; removal shifts later entries down

use super::handle::{ChannelId, HandlerId, HandlerRef};

/// Named routing key and its subscriber list.
#[derive(Debug)]
pub struct Channel {
    id: ChannelId,
    name: Box<str>,
    subscribers: Vec<HandlerRef>,
    capacity: usize,
}

impl Channel {
    pub(crate) fn new(id: ChannelId, name: &str, capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            subscribers: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Identifier of this channel within its registry.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Maximum number of subscribers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if no further handler can subscribe.
    pub fn is_full(&self) -> bool {
        self.subscribers.len() >= self.capacity
    }

    /// Subscribed handler ids in delivery order.
    pub fn subscriber_ids(&self) -> impl Iterator<Item = HandlerId> + '_ {
        self.subscribers.iter().map(|r| r.id)
    }

    /// Returns `true` if `id` is subscribed.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.subscribers.iter().any(|r| r.id == id)
    }

    pub(crate) fn refs(&self) -> &[HandlerRef] {
        &self.subscribers
    }

    /// Appends `handler`; `false` if the list is full. Callers check for duplicates.
    pub(crate) fn push(&mut self, handler: HandlerRef) -> bool {
        if self.is_full() {
            return false;
        }
        self.subscribers.push(handler);
        true
    }

    /// Removes `handler`, keeping the remaining order. Returns whether it was present.
    pub(crate) fn remove(&mut self, handler: HandlerRef) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|r| *r != handler);
        before != self.subscribers.len()
    }

    pub(crate) fn clear(&mut self) {
        self.subscribers.clear();
    }
}
