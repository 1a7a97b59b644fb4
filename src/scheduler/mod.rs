//! Timeline - deterministic timer queue.
//!
//! Stands in for the page's event loop. Components schedule delayed work with
//! [`Timeline::schedule`]; the host advances the clock with
//! [`Timeline::advance`] (from a real frame callback) and tests advance it
//! explicitly, so every animation is stepped without real sleeping.
//!
//! # Pattern
//!
//! - One clock per page, shared by cloning the handle
//! - Tasks due at the same instant run in scheduling order
//! - A task may schedule further tasks; they run in the same `advance` call if
//!   they fall due before its target time
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::scheduler::Timeline;
//!
//! let timeline = Timeline::new();
//! timeline.schedule(2000, || println!("sent"));
//! timeline.advance(2000); // prints "sent"
//! ```

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

use crate::types::Millis;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

type Task = Box<dyn FnOnce()>;

// =============================================================================
// TIMER QUEUE
// =============================================================================

#[derive(Default)]
struct TimerQueue {
    now: Millis,
    next_seq: u64,
    /// Min-heap of (due, seq). `seq` breaks ties in scheduling order.
    due: BinaryHeap<Reverse<(Millis, u64)>>,
    tasks: HashMap<u64, Task>,
}

impl TimerQueue {
    /// Pop the next live task due at or before `until`.
    fn pop_due(&mut self, until: Millis) -> Option<(Millis, Task)> {
        while let Some(&Reverse((due, seq))) = self.due.peek() {
            if due > until {
                return None;
            }
            self.due.pop();
            // Cancelled timers leave a stale heap entry behind
            if let Some(task) = self.tasks.remove(&seq) {
                return Some((due, task));
            }
        }
        None
    }
}

/// Cloneable handle to one shared timer queue.
#[derive(Clone, Default)]
pub struct Timeline {
    inner: Rc<RefCell<TimerQueue>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live handles on this queue, including ones captured by queued tasks.
    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Current clock value.
    pub fn now(&self) -> Millis {
        self.inner.borrow().now
    }

    /// Run `task` once, `delay_ms` after the current time.
    pub fn schedule<F>(&self, delay_ms: Millis, task: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let mut queue = self.inner.borrow_mut();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        let due = queue.now + delay_ms;
        queue.due.push(Reverse((due, seq)));
        queue.tasks.insert(seq, Box::new(task));
        TimerId(seq)
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner.borrow_mut().tasks.remove(&id.0).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().tasks.contains_key(&id.0)
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Move the clock forward by `ms`, running every task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, ms: Millis) -> usize {
        let target = self.now() + ms;
        self.advance_to(target)
    }

    /// Move the clock to `target` (never backwards), running due tasks.
    pub fn advance_to(&self, target: Millis) -> usize {
        let mut ran = 0;
        loop {
            // Release the borrow before running the task, it may schedule more
            let next = self.inner.borrow_mut().pop_due(target);
            match next {
                Some((due, task)) => {
                    {
                        let mut queue = self.inner.borrow_mut();
                        queue.now = queue.now.max(due);
                    }
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        let mut queue = self.inner.borrow_mut();
        queue.now = queue.now.max(target);
        ran
    }

    /// Run only what is due right now (zero-delay tasks).
    pub fn flush(&self) -> usize {
        self.advance(0)
    }

    /// Drop every pending task without running it.
    pub fn clear(&self) {
        let mut queue = self.inner.borrow_mut();
        queue.tasks.clear();
        queue.due.clear();
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queue = self.inner.borrow();
        f.debug_struct("Timeline")
            .field("now", &queue.now)
            .field("pending", &queue.tasks.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_task_runs_when_due() {
        let timeline = Timeline::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        timeline.schedule(100, move || fired_clone.set(true));

        timeline.advance(99);
        assert!(!fired.get());

        timeline.advance(1);
        assert!(fired.get());
        assert_eq!(timeline.now(), 100);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn test_same_instant_runs_in_schedule_order() {
        let timeline = Timeline::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            timeline.schedule(50, move || order.borrow_mut().push(i));
        }

        timeline.advance(50);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel() {
        let timeline = Timeline::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let id = timeline.schedule(10, move || count_clone.set(count_clone.get() + 1));
        assert!(timeline.is_pending(id));
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));

        timeline.advance(100);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_rescheduling_task_chains_within_one_advance() {
        let timeline = Timeline::new();
        let ticks = Rc::new(Cell::new(0));

        fn tick(timeline: Timeline, ticks: Rc<Cell<u32>>) {
            ticks.set(ticks.get() + 1);
            let next = timeline.clone();
            timeline.schedule(10, move || tick(next, ticks));
        }

        let t = timeline.clone();
        let k = ticks.clone();
        timeline.schedule(10, move || tick(t, k));

        // Due at 10, 20, 30, 40, 50
        timeline.advance(55);
        assert_eq!(ticks.get(), 5);
        assert_eq!(timeline.pending(), 1);
    }

    #[test]
    fn test_task_sees_its_due_time_as_now() {
        let timeline = Timeline::new();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        let t = timeline.clone();

        timeline.schedule(30, move || seen_clone.set(t.now()));
        timeline.advance(100);

        assert_eq!(seen.get(), 30);
        assert_eq!(timeline.now(), 100);
    }

    #[test]
    fn test_clear_drops_everything() {
        let timeline = Timeline::new();
        timeline.schedule(1, || panic!("should not run"));
        timeline.clear();
        assert_eq!(timeline.advance(10), 0);
    }
}
