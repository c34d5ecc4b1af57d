//! Quiet-period scheduling for re-validation on edit.
//!
//! A [`Debouncer`] holds at most one pending item per key. Scheduling again
//! replaces the item and restarts its timer, so a burst of edits produces a
//! single firing once the document has been quiet for the whole delay.
//!
//! Time is passed in by the caller. The owner polls from its own loop, which
//! keeps firing on the owner's thread and makes the timing testable.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Schedule `key`, cancelling any schedule it already had.
    pub fn schedule(&mut self, key: K, now: Instant) {
        self.pending.insert(key, now);
    }

    /// Drop a pending schedule without firing it.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Take every key whose quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<K> {
        let delay = self.delay;
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, at)| now.saturating_duration_since(**at) >= delay)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }
}
