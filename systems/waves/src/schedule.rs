//! Cooperative deferred-action queue keyed on simulated time.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

/// Min-heap of actions waiting for the simulation clock to reach their fire time.
///
/// Actions sharing a fire time are released in the order they were scheduled.
#[derive(Debug)]
pub struct DeferredQueue<A> {
    heap: BinaryHeap<Reverse<Scheduled<A>>>,
    next_sequence: u64,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }
}

impl<A> DeferredQueue<A> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to fire once the clock reaches `fire_at`.
    pub fn schedule(&mut self, fire_at: Duration, action: A) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Reverse(Scheduled {
            fire_at,
            sequence,
            action,
        }));
    }

    /// Removes and returns the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, A)> {
        let due = self
            .heap
            .peek()
            .is_some_and(|Reverse(next)| next.fire_at <= now);
        if !due {
            return None;
        }

        self.heap
            .pop()
            .map(|Reverse(scheduled)| (scheduled.fire_at, scheduled.action))
    }

    /// Fire time of the earliest pending action.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(next)| next.fire_at)
    }

    /// Drops every pending action, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.heap.len();
        self.heap.clear();
        cancelled
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Reports whether no actions are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[derive(Debug)]
struct Scheduled<A> {
    fire_at: Duration,
    sequence: u64,
    action: A,
}

impl<A> Scheduled<A> {
    fn key(&self) -> (Duration, u64) {
        (self.fire_at, self.sequence)
    }
}

impl<A> PartialEq for Scheduled<A> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<A> Eq for Scheduled<A> {}

impl<A> PartialOrd for Scheduled<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Scheduled<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_actions_in_fire_time_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_secs(3), "c");
        queue.schedule(Duration::from_secs(1), "a");
        queue.schedule(Duration::from_secs(2), "b");

        let now = Duration::from_secs(5);
        assert_eq!(queue.pop_due(now), Some((Duration::from_secs(1), "a")));
        assert_eq!(queue.pop_due(now), Some((Duration::from_secs(2), "b")));
        assert_eq!(queue.pop_due(now), Some((Duration::from_secs(3), "c")));
        assert_eq!(queue.pop_due(now), None);
    }

    #[test]
    fn ties_release_in_scheduling_order() {
        let mut queue = DeferredQueue::new();
        for label in ["first", "second", "third"] {
            queue.schedule(Duration::from_millis(500), label);
        }

        let now = Duration::from_millis(500);
        let drained: Vec<_> = std::iter::from_fn(|| queue.pop_due(now))
            .map(|(_, label)| label)
            .collect();
        assert_eq!(drained, ["first", "second", "third"]);
    }

    #[test]
    fn actions_wait_for_their_fire_time() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_millis(1_000), ());

        assert_eq!(queue.pop_due(Duration::from_millis(999)), None);
        assert_eq!(queue.next_fire_time(), Some(Duration::from_millis(1_000)));
        assert_eq!(
            queue.pop_due(Duration::from_millis(1_000)),
            Some((Duration::from_millis(1_000), ()))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_all_drops_pending_actions() {
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::ZERO, 1);
        queue.schedule(Duration::from_secs(1), 2);

        assert_eq!(queue.cancel_all(), 2);
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop_due(Duration::MAX), None);
    }
}
