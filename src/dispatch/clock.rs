//! # Timestamp resolution.
//!
//! Every event gets a timestamp chosen in this order:
//!
//! ```text
//! explicit != 0 ──► explicit
//! provider set  ──► provider()
//! otherwise     ──► sequence (start_sequence, +1 per event)
//! ```
//!
//! Provider output is used verbatim, zero included. The sequence only advances
//! when it is actually used.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Installed timestamp source (wall clock, NTP-corrected clock, tick counter, ...).
pub type TimestampFn = dyn Fn() -> u64 + Send + Sync;

pub(crate) struct Clock {
    provider: Option<Box<TimestampFn>>,
    sequence: AtomicU64,
}

impl Clock {
    pub(crate) fn new(first_sequence: u64) -> Self {
        Self {
            provider: None,
            sequence: AtomicU64::new(first_sequence.max(1)),
        }
    }

    pub(crate) fn set_provider(&mut self, provider: Box<TimestampFn>) {
        self.provider = Some(provider);
    }

    pub(crate) fn clear_provider(&mut self) -> bool {
        self.provider.take().is_some()
    }

    #[cfg(test)]
    pub(crate) fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Value the fallback sequence will hand out next.
    pub(crate) fn peek_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    pub(crate) fn resolve(&self, explicit: u64) -> u64 {
        if explicit != 0 {
            return explicit;
        }
        match &self.provider {
            Some(provider) => provider(),
            None => self.sequence.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("provider", &self.provider.is_some())
            .field("sequence", &self.peek_sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins_over_provider() {
        let mut clock = Clock::new(1);
        clock.set_provider(Box::new(|| 555));
        assert_eq!(clock.resolve(987_654_321), 987_654_321);
    }

    #[test]
    fn test_provider_wins_over_sequence() {
        let mut clock = Clock::new(1);
        clock.set_provider(Box::new(|| 123_456_789));
        assert_eq!(clock.resolve(0), 123_456_789);
        assert_eq!(clock.peek_sequence(), 1, "sequence must not advance while a provider is set");
    }

    #[test]
    fn test_provider_zero_is_passed_through() {
        let mut clock = Clock::new(1);
        clock.set_provider(Box::new(|| 0));
        assert_eq!(clock.resolve(0), 0);
        assert_eq!(clock.peek_sequence(), 1);
    }

    #[test]
    fn test_sequence_fallback_is_strictly_increasing() {
        let clock = Clock::new(1);
        let got: Vec<u64> = (0..4).map(|_| clock.resolve(0)).collect();
        assert_eq!(got, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_clearing_provider_restores_sequence() {
        let mut clock = Clock::new(10);
        clock.set_provider(Box::new(|| 7));
        assert!(clock.has_provider());
        assert!(clock.clear_provider());
        assert!(!clock.clear_provider());
        assert_eq!(clock.resolve(0), 10);
    }
}
