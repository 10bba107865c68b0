//! # Simulation Clock
//!
//! A virtual scheduler of delayed tasks.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SimClock<T>                                      │
//! │                                                                         │
//! │  now ──► 7                                                             │
//! │                                                                         │
//! │  queue (ordered by due tick, then schedule order)                      │
//! │  ┌──────────┬──────────┬────────────────────────┐                      │
//! │  │ due: 9   │ id: #4   │ task                   │ ◄── pop_due(10)      │
//! │  │ due: 10  │ id: #5   │ task                   │ ◄── pop_due(10)      │
//! │  │ due: 12  │ id: #6   │ task                   │     (stays queued)   │
//! │  └──────────┴──────────┴────────────────────────┘                      │
//! │                                                                         │
//! │  Time only moves inside pop_due / advance_to. Nothing sleeps.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Popping a task moves `now` to the task's due tick, so anything the task
//! schedules in turn is timed from the moment it fired, not from the end of
//! the window being advanced.

use std::collections::BTreeMap;

/// One unit of simulated time.
pub type Tick = u64;

/// Insertion order, breaking ties between tasks due on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimerId(u64);

/// Virtual clock holding tasks of type `T`.
#[derive(Debug, Clone)]
pub struct SimClock<T> {
    now: Tick,
    next_id: u64,
    queue: BTreeMap<(Tick, TimerId), T>,
}

impl<T> Default for SimClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SimClock<T> {
    /// Creates a clock at tick 0 with nothing scheduled.
    pub fn new() -> Self {
        SimClock {
            now: 0,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Number of tasks waiting to fire.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Due tick of the earliest task, if any.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Schedules `task` to fire `delay` ticks from now.
    pub fn schedule(&mut self, delay: Tick, task: T) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now.saturating_add(delay), id), task);
    }

    /// Drops every scheduled task. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Removes and returns the earliest task due at or before `until`,
    /// moving `now` forward to its due tick.
    pub fn pop_due(&mut self, until: Tick) -> Option<(Tick, T)> {
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }

        let task = self.queue.remove(&key)?;
        self.now = self.now.max(key.0);
        Some((key.0, task))
    }

    /// Moves `now` forward to `tick`. Never moves backwards.
    ///
    /// Tasks due before `tick` are NOT fired; drain them with
    /// [`SimClock::pop_due`] first.
    pub fn advance_to(&mut self, tick: Tick) {
        self.now = self.now.max(tick);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_respects_window() {
        let mut clock = SimClock::new();
        clock.schedule(3, "late");
        clock.schedule(1, "early");

        assert_eq!(clock.pop_due(0), None);
        assert_eq!(clock.pop_due(2), Some((1, "early")));
        assert_eq!(clock.now(), 1);
        assert_eq!(clock.pop_due(2), None);
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_same_tick_fires_in_schedule_order() {
        let mut clock = SimClock::new();
        clock.schedule(2, "first");
        clock.schedule(2, "second");

        assert_eq!(clock.pop_due(2).map(|(_, t)| t), Some("first"));
        assert_eq!(clock.pop_due(2).map(|(_, t)| t), Some("second"));
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut clock = SimClock::new();
        clock.advance_to(10);
        clock.schedule(3, ());
        assert_eq!(clock.next_due(), Some(13));
    }

    #[test]
    fn test_cancel_all() {
        let mut clock = SimClock::new();
        clock.schedule(1, 'a');
        clock.schedule(5, 'b');

        assert_eq!(clock.cancel_all(), 2);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.next_due(), None);
    }

    #[test]
    fn test_advance_to_never_goes_backwards() {
        let mut clock: SimClock<()> = SimClock::new();
        clock.advance_to(5);
        clock.advance_to(2);
        assert_eq!(clock.now(), 5);
    }
}
