//! Single-slot debounce scheduler.
//!
//! The scheduler holds at most one pending task. Scheduling again replaces
//! the pending task, so a burst of requests collapses into the last one.
//! There is no background thread: the owning event loop asks for the next
//! deadline, sleeps until then, and calls [`Debouncer::take_due`]. A task
//! that was replaced or cancelled is gone and can never be handed out.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time for deadlines.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a host or test can keep one handle and
/// give another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

struct Pending<T> {
    generation: u64,
    deadline: Instant,
    task: T,
}

/// Holds at most one deferred task.
pub struct Debouncer<T> {
    pending: Option<Pending<T>>,
    generation: u64,
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    /// Arm `task` to become due `delay` after `now`, dropping any task that
    /// has not fired yet. Returns the generation of the new task.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> u64 {
        self.generation += 1;
        if let Some(old) = self.pending.take() {
            tracing::trace!(
                superseded = old.generation,
                by = self.generation,
                "debounce: replacing pending task"
            );
        }
        self.pending = Some(Pending {
            generation: self.generation,
            deadline: now + delay,
            task,
        });
        self.generation
    }

    /// Drop the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(old) = self.pending.take() {
            tracing::trace!(cancelled = old.generation, "debounce: cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending task, if any.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.task)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Generation of the most recently scheduled task.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hand out the pending task if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.task),
            _ => None,
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.pending())
            .field("deadline", &self.deadline())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn test_task_fires_after_delay() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new();
        debouncer.schedule(clock.now(), DELAY, "helo");

        clock.advance(Duration::from_millis(49));
        assert_eq!(debouncer.take_due(clock.now()), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(debouncer.take_due(clock.now()), Some("helo"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_due(clock.now()), None);
    }

    #[test]
    fn test_second_schedule_supersedes_first() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new();
        let first = debouncer.schedule(clock.now(), DELAY, "hel");
        clock.advance(Duration::from_millis(30));
        let second = debouncer.schedule(clock.now(), DELAY, "helo");
        assert!(second > first);

        // the first deadline has passed, but the first task is gone
        clock.advance(Duration::from_millis(30));
        assert_eq!(debouncer.take_due(clock.now()), None);

        clock.advance(Duration::from_millis(20));
        assert_eq!(debouncer.take_due(clock.now()), Some("helo"));
        assert_eq!(debouncer.take_due(clock.now()), None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new();
        debouncer.schedule(clock.now(), DELAY, 1);
        debouncer.cancel();
        debouncer.cancel();
        clock.advance(DELAY);
        assert_eq!(debouncer.take_due(clock.now()), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();
        clock.advance(DELAY);
        assert_eq!(other.now(), start + DELAY);
    }
}
