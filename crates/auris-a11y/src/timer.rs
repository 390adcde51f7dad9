//! Timers
//!
//! Cancel-and-reschedule timers driven by caller-supplied instants. A new
//! trigger inside the window pushes the deadline out instead of stacking.

use std::time::{Duration, Instant};

/// Single debounce timer
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    pending_at: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending_at: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the timer to fire `delay` after `now`
    pub fn schedule(&mut self, now: Instant) {
        self.pending_at = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.pending_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending_at
    }

    /// Disarm and return true once the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.pending_at {
            Some(at) if now >= at => {
                self.pending_at = None;
                true
            }
            _ => false,
        }
    }
}

/// One debounce timer per key
#[derive(Debug, Clone)]
pub struct KeyedDebounce<K> {
    delay: Duration,
    pending: Vec<(K, Instant)>,
}

impl<K: PartialEq + Clone> KeyedDebounce<K> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Vec::new() }
    }

    /// (Re)arm the timer for `key`
    pub fn schedule(&mut self, key: K, now: Instant) {
        let at = now + self.delay;
        match self.pending.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = at,
            None => self.pending.push((key, at)),
        }
    }

    pub fn cancel(&mut self, key: &K) {
        self.pending.retain(|(k, _)| k != key);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every key whose deadline has passed, in scheduling order
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due = Vec::new();
        self.pending.retain(|(k, at)| {
            if now >= *at {
                due.push(k.clone());
                false
            } else {
                true
            }
        });
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at)| *at).min()
    }
}
