//! # Handler registry.
//!
//! [`Registry`] owns the two indexes the router needs:
//!
//! ```text
//!   slots   [ rec#1 | rec#4 | ---- | rec#3 ]     fixed, records never move
//!   order   [ (0,#1) (3,#3) (1,#4) ]             registration order, compacted
//!   channels
//!     "CORE" [ (0,#1) (1,#4) ]                   back-references (slot, id)
//!     "OTA"  [ (3,#3) ]
//! ```
//!
//! ## Rules
//! - A record stays in its slot for its whole lifetime; deleting one record never
//!   moves another, so back-references held by channels stay valid.
//! - A back-reference resolves only if the slot still holds a record with the same
//!   id. Ids are never reused, so a freed and refilled slot cannot be mistaken for
//!   the old handler.
//! - Only `order` is compacted on deletion; it holds references, not records.
//! - Capacity checks happen before any mutation: a failed registration leaves the
//!   registry untouched.
//!
//! ## Example
//! ```rust
//! use tagrouter::{HandlerSpec, LogLevel, Registry, RouterConfig};
//!
//! let mut registry = Registry::new(RouterConfig::default());
//! let reg = registry
//!     .register(HandlerSpec::from_fn(LogLevel::Info, |_, _| {}).named("serial").on("CORE"))
//!     .unwrap();
//!
//! assert_eq!(reg.id().get(), 1);
//! assert!(registry.find_by_name("serial").is_some());
//! assert!(registry.delete_by_id(reg.id()));
//! assert!(registry.is_empty());
//! ```

use super::channel::Channel;
use super::handle::{ChannelId, HandlerId, HandlerRef};
use super::record::{HandlerRecord, HandlerSpec};
use super::subscriptions::{self, SkipReason, SkippedChannel};
use crate::config::RouterConfig;
use crate::error::RegistryError;

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    id: HandlerId,
    skipped: Vec<SkippedChannel>,
}

impl Registration {
    /// Id assigned to the new handler.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Requested channels the handler was not subscribed to.
    pub fn skipped(&self) -> &[SkippedChannel] {
        &self.skipped
    }

    /// Returns `true` if every requested channel got the subscription.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Monotonic counters describing the registry's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Successful registrations.
    pub registered: u64,
    /// Records removed by delete or clear.
    pub deleted: u64,
    /// Registrations refused with an error.
    pub rejected: u64,
    /// Requested channel subscriptions that were skipped.
    pub skipped_subscriptions: u64,
}

/// Fixed-capacity store of handler records plus the per-channel subscriber index.
pub struct Registry {
    config: RouterConfig,
    slots: Vec<Option<HandlerRecord>>,
    /// Free slot indices; popped from the back, lowest index first.
    free: Vec<usize>,
    order: Vec<HandlerRef>,
    channels: Vec<Channel>,
    next_id: u32,
    stats: RegistryStats,
}

impl Registry {
    /// Creates an empty registry; every table is allocated here, once.
    pub fn new(config: RouterConfig) -> Self {
        let handlers = config.handler_capacity();
        Self {
            slots: (0..handlers).map(|_| None).collect(),
            free: (0..handlers).rev().collect(),
            order: Vec::with_capacity(handlers),
            channels: Vec::with_capacity(config.channel_capacity()),
            next_id: 1,
            stats: RegistryStats::default(),
            config,
        }
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maximum number of handlers.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Lifetime counters.
    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    // ---------------------------
    // Channels
    // ---------------------------

    /// Returns the id of channel `name`, declaring it if needed.
    ///
    /// Channels are never removed; once declared a name keeps its id.
    pub fn declare_channel(&mut self, name: &str) -> Result<ChannelId, RegistryError> {
        if let Some(id) = self.channel_id(name) {
            return Ok(id);
        }
        let capacity = self.config.channel_capacity();
        if self.channels.len() >= capacity {
            return Err(RegistryError::ChannelTableFull { capacity });
        }
        let id = ChannelId(self.channels.len());
        self.channels
            .push(Channel::new(id, name, self.config.subscriber_capacity()));
        tracing::debug!(channel = name, index = id.index(), "channel declared");
        Ok(id)
    }

    /// Looks up a declared channel by exact name.
    pub fn channel_id(&self, name: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .find(|c| c.name() == name)
            .map(Channel::id)
    }

    /// Read-only access to a declared channel.
    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(id.index())
    }

    /// All declared channels, in declaration order.
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a handler and subscribes it to the channels named in `spec`.
    ///
    /// ### Errors
    /// - [`RegistryError::CapacityExceeded`] when every slot is taken
    /// - [`RegistryError::IdsExhausted`] when the id counter cannot advance
    ///
    /// Channels that could not be subscribed (saturated list, full channel table) do
    /// not fail the call; they are listed in [`Registration::skipped`].
    pub fn register(&mut self, spec: HandlerSpec) -> Result<Registration, RegistryError> {
        if let Err(err) = self.check_room() {
            self.stats.rejected += 1;
            tracing::debug!(reason = err.as_label(), name = ?spec.name, "registration refused");
            return Err(err);
        }
        let Some(slot) = self.free.pop() else {
            self.stats.rejected += 1;
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity(),
            });
        };

        let id = HandlerId(self.next_id);
        self.next_id += 1;
        let handler = HandlerRef { slot, id };

        // `skipped` stays unallocated unless something is skipped; `targets` becomes
        // the record's channel list and never exceeds the channel table.
        let mut skipped = Vec::new();
        let mut targets =
            Vec::with_capacity(spec.channels.len().min(self.config.channel_capacity()));
        for (i, name) in spec.channels.iter().enumerate() {
            if spec.channels[..i].contains(name) {
                continue;
            }
            match self.declare_channel(name) {
                Ok(channel) => targets.push(channel),
                Err(err) => {
                    tracing::warn!(
                        handler = %id,
                        channel = %name,
                        reason = err.as_label(),
                        "channel not declared; subscription skipped"
                    );
                    skipped.push(SkippedChannel {
                        channel: name.to_string(),
                        reason: SkipReason::ChannelTableFull,
                    });
                }
            }
        }

        subscriptions::subscribe(&mut self.channels, handler, &mut targets, &mut skipped);
        let subscribed = targets;

        tracing::debug!(
            handler = %id,
            name = ?spec.name,
            level = %spec.level,
            channels = subscribed.len(),
            skipped = skipped.len(),
            "handler registered"
        );

        self.slots[slot] = Some(HandlerRecord {
            id,
            name: spec.name,
            level: spec.level,
            handler: spec.handler,
            context: spec.context,
            filter: spec.filter,
            enabled: spec.enabled,
            channels: subscribed,
        });
        self.order.push(handler);
        self.stats.registered += 1;
        self.stats.skipped_subscriptions += skipped.len() as u64;

        Ok(Registration { id, skipped })
    }

    fn check_room(&self) -> Result<(), RegistryError> {
        if self.order.len() >= self.capacity() {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        if self.next_id == u32::MAX {
            return Err(RegistryError::IdsExhausted);
        }
        Ok(())
    }

    // ---------------------------
    // Lookup
    // ---------------------------

    /// Finds a handler by id.
    pub fn find_by_id(&self, id: HandlerId) -> Option<&HandlerRecord> {
        self.position_of(id).and_then(|pos| self.resolve(self.order[pos]))
    }

    /// Finds the first handler (in registration order) whose name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&HandlerRecord> {
        self.records().find(|rec| rec.name() == Some(name))
    }

    /// Read-only view of every registered handler.
    pub fn list(&self) -> HandlerList<'_> {
        HandlerList { registry: self }
    }

    /// Records in registration order.
    fn records(&self) -> impl Iterator<Item = &HandlerRecord> {
        self.order.iter().filter_map(|r| self.resolve(*r))
    }

    fn resolve(&self, handler: HandlerRef) -> Option<&HandlerRecord> {
        self.slots
            .get(handler.slot)?
            .as_ref()
            .filter(|rec| rec.id == handler.id)
    }

    fn position_of(&self, id: HandlerId) -> Option<usize> {
        self.order.iter().position(|r| r.id == id)
    }

    /// Subscribers of `channel` in delivery order.
    pub(crate) fn subscribers<'a>(
        &'a self,
        channel: &'a Channel,
    ) -> impl Iterator<Item = &'a HandlerRecord> + 'a {
        channel.refs().iter().filter_map(|r| self.resolve(*r))
    }

    // ---------------------------
    // Mutation
    // ---------------------------

    /// Enables or disables a handler without touching its subscriptions.
    ///
    /// Returns `false` if no handler has this id.
    pub fn set_enabled(&mut self, id: HandlerId, enabled: bool) -> bool {
        let Some(pos) = self.position_of(id) else {
            return false;
        };
        let slot = self.order[pos].slot;
        match self.slots[slot].as_mut() {
            Some(rec) => {
                rec.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Shorthand for `set_enabled(id, true)`.
    pub fn enable(&mut self, id: HandlerId) -> bool {
        self.set_enabled(id, true)
    }

    /// Shorthand for `set_enabled(id, false)`.
    pub fn disable(&mut self, id: HandlerId) -> bool {
        self.set_enabled(id, false)
    }

    /// Removes the handler with this id from every channel and from the registry.
    ///
    /// Returns `false` if no handler has this id.
    pub fn delete_by_id(&mut self, id: HandlerId) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.remove_at(pos);
                true
            }
            None => false,
        }
    }

    /// Removes the first handler (in registration order) named `name`.
    ///
    /// Other handlers sharing the name are untouched. Returns `false` if none matched.
    pub fn delete_by_name(&mut self, name: &str) -> bool {
        let pos = self.order.iter().position(|r| {
            self.resolve(*r)
                .is_some_and(|rec| rec.name() == Some(name))
        });
        match pos {
            Some(pos) => {
                self.remove_at(pos);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, pos: usize) {
        let handler = self.order.remove(pos);
        let Some(record) = self.slots[handler.slot].take() else {
            return;
        };
        let pruned = subscriptions::unsubscribe(&mut self.channels, handler, &record.channels);
        self.free.push(handler.slot);
        self.stats.deleted += 1;
        tracing::debug!(handler = %handler.id, name = ?record.name, pruned, "handler deleted");
    }

    /// Removes every handler.
    ///
    /// Every channel's subscriber list is emptied first, so no back-reference
    /// survives. Declared channels stay declared, and the id counter keeps counting.
    pub fn clear(&mut self) {
        subscriptions::prune_all(&mut self.channels);
        let removed = self.order.len();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.order.clear();
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev());
        self.stats.deleted += removed as u64;
        tracing::debug!(removed, "registry cleared");
    }

    // ---------------------------
    // Diagnostics
    // ---------------------------

    /// Checks both directions of the back-reference invariant.
    ///
    /// - every channel recorded by a handler holds exactly one reference to it
    /// - every reference held by a channel resolves to a handler that records it
    /// - no channel exceeds its capacity
    pub fn is_consistent(&self) -> bool {
        let forward = self.order.iter().all(|r| {
            self.resolve(*r).is_some_and(|rec| {
                rec.channels.iter().all(|c| {
                    self.channels
                        .get(c.index())
                        .is_some_and(|ch| ch.refs().iter().filter(|x| *x == r).count() == 1)
                })
            })
        });
        let backward = self.channels.iter().all(|ch| {
            ch.len() <= ch.capacity()
                && ch.refs().iter().all(|r| {
                    self.resolve(*r)
                        .is_some_and(|rec| rec.channels.contains(&ch.id()))
                })
        });
        forward && backward && self.order.len() + self.free.len() == self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn set_next_id(&mut self, next: u32) {
        self.next_id = next;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("channels", &self.channels.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Read-only view over the registered handlers, in registration order.
#[derive(Clone, Copy)]
pub struct HandlerList<'a> {
    registry: &'a Registry,
}

impl<'a> HandlerList<'a> {
    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> impl Iterator<Item = &'a HandlerRecord> + 'a {
        let registry = self.registry;
        registry.order.iter().filter_map(move |r| registry.resolve(*r))
    }
}

impl<'a> IntoIterator for HandlerList<'a> {
    type Item = &'a HandlerRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a HandlerRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
