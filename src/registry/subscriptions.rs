//! # Subscription index maintenance.
//!
//! Keeps every channel's subscriber list in step with registry membership. The
//! registry calls into this module on each mutation; nothing else writes to a
//! channel's list.
//!
//! ## Rules
//! - `subscribe` appends one back-reference per target channel, skipping targets
//!   already holding this handler (no duplicates) and saturated channels (reported
//!   as [`SkipReason::SubscribersFull`], logged, never fatal).
//! - `unsubscribe` removes the back-reference from exactly the channels recorded as
//!   subscribed, closing the gap while keeping delivery order.
//! - `prune_all` empties every channel, used by [`Registry::clear`](crate::Registry::clear).
//!
//! Both `subscribe` and `unsubscribe` are `O(targets * subscribers_per_channel)`.

use std::fmt;

use super::channel::Channel;
use super::handle::{ChannelId, HandlerRef};

/// Why a requested channel did not get a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The channel's subscriber list is at capacity.
    SubscribersFull,
    /// The channel did not exist and the channel table had no room to declare it.
    ChannelTableFull,
}

impl SkipReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SkipReason::SubscribersFull => "subscribers_full",
            SkipReason::ChannelTableFull => "channel_table_full",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A channel a registration asked for but was not subscribed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChannel {
    /// Requested channel name.
    pub channel: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Subscribes `handler` to each of `targets`.
///
/// On return `targets` holds only the channels that now carry the back-reference,
/// in request order, each once. Every saturated target is appended to `skipped`.
pub(crate) fn subscribe(
    channels: &mut [Channel],
    handler: HandlerRef,
    targets: &mut Vec<ChannelId>,
    skipped: &mut Vec<SkippedChannel>,
) {
    let mut kept = 0;
    for i in 0..targets.len() {
        let target = targets[i];
        if targets[..i].contains(&target) {
            continue;
        }
        let Some(channel) = channels.get_mut(target.index()) else {
            continue;
        };

        if channel.push(handler) {
            targets[kept] = target;
            kept += 1;
        } else {
            tracing::warn!(
                handler = %handler.id,
                channel = channel.name(),
                capacity = channel.capacity(),
                "channel saturated; subscription skipped"
            );
            skipped.push(SkippedChannel {
                channel: channel.name().to_string(),
                reason: SkipReason::SubscribersFull,
            });
        }
    }
    targets.truncate(kept);
}

/// Removes `handler` from every channel in `subscribed`. Returns how many lists changed.
pub(crate) fn unsubscribe(
    channels: &mut [Channel],
    handler: HandlerRef,
    subscribed: &[ChannelId],
) -> usize {
    let mut changed = 0;
    for id in subscribed {
        if let Some(channel) = channels.get_mut(id.index()) {
            if channel.remove(handler) {
                changed += 1;
            }
        }
    }
    changed
}

/// Empties every channel's subscriber list.
pub(crate) fn prune_all(channels: &mut [Channel]) {
    for channel in channels {
        channel.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::handle::HandlerId;
    use tracing_test::traced_test;

    fn table(capacity: usize) -> Vec<Channel> {
        ["CORE", "OTA", "WIFI"]
            .iter()
            .enumerate()
            .map(|(i, name)| Channel::new(ChannelId(i), name, capacity))
            .collect()
    }

    fn href(slot: usize, id: u32) -> HandlerRef {
        HandlerRef {
            slot,
            id: HandlerId(id),
        }
    }

    #[test]
    fn test_subscribe_collapses_duplicates() {
        let mut channels = table(4);
        let mut skipped = Vec::new();
        let mut targets = vec![ChannelId(0), ChannelId(0), ChannelId(2)];
        subscribe(&mut channels, href(0, 1), &mut targets, &mut skipped);
        assert_eq!(targets, vec![ChannelId(0), ChannelId(2)]);
        assert_eq!(channels[0].len(), 1);
        assert!(skipped.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_subscribe_skips_saturated_channel() {
        let mut channels = table(1);
        let mut skipped = Vec::new();
        subscribe(&mut channels, href(0, 1), &mut vec![ChannelId(1)], &mut skipped);

        let mut targets = vec![ChannelId(0), ChannelId(1)];
        subscribe(&mut channels, href(1, 2), &mut targets, &mut skipped);

        assert_eq!(targets, vec![ChannelId(0)]);
        assert_eq!(
            skipped,
            vec![SkippedChannel {
                channel: "OTA".into(),
                reason: SkipReason::SubscribersFull,
            }]
        );
        assert!(logs_contain("channel saturated; subscription skipped"));
    }

    #[test]
    fn test_repeated_saturated_channel_is_reported_once() {
        let mut channels = table(1);
        let mut skipped = Vec::new();
        subscribe(&mut channels, href(0, 1), &mut vec![ChannelId(1)], &mut skipped);

        let mut targets = vec![ChannelId(1), ChannelId(2), ChannelId(1)];
        subscribe(&mut channels, href(1, 2), &mut targets, &mut skipped);

        assert_eq!(targets, vec![ChannelId(2)]);
        assert_eq!(skipped.len(), 1, "duplicate request must not be reported twice");
        assert_eq!(channels[1].len(), 1);
    }

    #[test]
    fn test_unsubscribe_touches_only_recorded_channels() {
        let mut channels = table(4);
        let mut skipped = Vec::new();
        let a = href(0, 1);
        let b = href(1, 2);
        let mut a_subs = vec![ChannelId(0), ChannelId(1)];
        subscribe(&mut channels, a, &mut a_subs, &mut skipped);
        subscribe(
            &mut channels,
            b,
            &mut vec![ChannelId(0), ChannelId(1), ChannelId(2)],
            &mut skipped,
        );

        assert_eq!(unsubscribe(&mut channels, a, &a_subs), 2);
        assert_eq!(unsubscribe(&mut channels, a, &a_subs), 0, "second pass finds nothing");
        for channel in &channels {
            assert!(!channel.contains(HandlerId(1)), "{} kept stale ref", channel.name());
            assert!(channel.contains(HandlerId(2)));
        }
    }

    #[test]
    fn test_prune_all_empties_every_channel() {
        let mut channels = table(4);
        let mut skipped = Vec::new();
        subscribe(
            &mut channels,
            href(0, 1),
            &mut vec![ChannelId(0), ChannelId(2)],
            &mut skipped,
        );
        prune_all(&mut channels);
        assert!(channels.iter().all(Channel::is_empty));
    }
}
