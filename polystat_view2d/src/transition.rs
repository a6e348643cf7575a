// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recenter transitions keyed by a layout generation counter.
//!
//! When grouping produces a materially different set of groups, the view is
//! refit and dependent chrome (group headers) must stay hidden until the new
//! layout has settled. [`TransitionTracker`] models this without timers:
//!
//! 1. [`TransitionTracker::begin`] is called with a grouping fingerprint. If it
//!    differs from the last one, the generation counter is bumped and a
//!    transition opens.
//! 2. The host reports [`TransitionTracker::settle`] with the generation it
//!    finished laying out; stale generations are ignored.
//! 3. [`TransitionTracker::poll`] force-closes a transition older than the
//!    safety timeout, bounding how long headers can stay hidden.
//!
//! Time is supplied by the caller as a monotonic [`Duration`].

use core::time::Duration;

/// Default safety timeout for an unsettled transition.
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_millis(300);

/// Tracks the in-flight recenter transition, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTracker {
    generation: u64,
    in_flight: Option<InFlight>,
    last_signature: Option<u64>,
    timeout: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    generation: u64,
    started_at: Duration,
}

impl TransitionTracker {
    /// Creates a tracker with the given safety timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            generation: 0,
            in_flight: None,
            last_signature: None,
            timeout,
        }
    }

    /// Current layout generation. Bumped by every transition.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while a transition awaits settlement.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The safety timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Opens a transition if `signature` differs from the last one seen.
    ///
    /// Returns the new generation, or `None` when the grouping is unchanged.
    /// A transition already in flight is superseded.
    pub fn begin(&mut self, signature: u64, now: Duration) -> Option<u64> {
        if self.last_signature == Some(signature) {
            return None;
        }
        self.last_signature = Some(signature);
        self.generation += 1;
        self.in_flight = Some(InFlight {
            generation: self.generation,
            started_at: now,
        });
        Some(self.generation)
    }

    /// Closes the transition for `generation`.
    ///
    /// Returns `true` if a transition was closed.
    pub fn settle(&mut self, generation: u64) -> bool {
        match self.in_flight {
            Some(in_flight) if in_flight.generation == generation => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Closes a transition that has been open for at least the timeout.
    ///
    /// Returns `true` if a transition was closed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.in_flight {
            Some(in_flight) if now.saturating_sub(in_flight.started_at) >= self.timeout => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Forgets the last grouping so the next [`begin`](Self::begin) always
    /// opens a transition. Used when grouping is switched off.
    pub fn forget_signature(&mut self) {
        self.last_signature = None;
    }
}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::TransitionTracker;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn new_signature_opens_transition() {
        let mut t = TransitionTracker::default();
        assert!(!t.is_transitioning());
        assert_eq!(t.begin(7, ms(0)), Some(1));
        assert!(t.is_transitioning());
        // Same grouping again: nothing to do.
        assert_eq!(t.begin(7, ms(10)), None);
        assert_eq!(t.generation(), 1);
    }

    #[test]
    fn stale_generation_does_not_settle() {
        let mut t = TransitionTracker::default();
        let first = t.begin(1, ms(0)).unwrap();
        let second = t.begin(2, ms(5)).unwrap();
        assert!(!t.settle(first), "superseded generation must be ignored");
        assert!(t.is_transitioning());
        assert!(t.settle(second));
        assert!(!t.is_transitioning());
    }

    #[test]
    fn timeout_force_clears() {
        let mut t = TransitionTracker::new(ms(300));
        t.begin(1, ms(1_000));
        assert!(!t.poll(ms(1_299)));
        assert!(t.poll(ms(1_300)));
        assert!(!t.is_transitioning());
        assert!(!t.poll(ms(5_000)), "nothing left to clear");
    }

    #[test]
    fn forget_signature_reopens() {
        let mut t = TransitionTracker::default();
        t.begin(3, ms(0));
        t.settle(1);
        t.forget_signature();
        assert_eq!(t.begin(3, ms(1)), Some(2));
    }
}
