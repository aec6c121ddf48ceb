//! Virtual-clock timer queue
//!
//! Stands in for the host event loop's timers. The host advances the clock;
//! due entries come out in deadline order, ties in scheduling order.

use std::collections::{BTreeMap, HashMap};

/// Handle for a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), T>,
    deadlines: HashMap<TimerId, u64>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current clock (ms)
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, id), payload);
        self.deadlines.insert(id, due);
        id
    }

    /// Cancel a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pop the earliest entry due at or before `until_ms`, moving the clock to its deadline
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, T)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until_ms {
            return None;
        }
        let payload = self.queue.remove(&(due, id))?;
        self.deadlines.remove(&id);
        self.now_ms = self.now_ms.max(due);
        Some((id, payload))
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
