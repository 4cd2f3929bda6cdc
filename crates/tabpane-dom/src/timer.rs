//! Deferred work
//!
//! All deferral is fire-and-forget: nothing is awaited and nothing is
//! cancelled. A task scheduled twice simply runs twice.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` once, no earlier than `delay` from now.
    fn defer(&self, delay: Duration, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn defer(&self, delay: Duration, task: Task) {
        (**self).defer(delay, task)
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_seq: u64,
    queue: Vec<Pending>,
}

/// Virtual-clock scheduler. Time only moves when [`ManualScheduler::advance`]
/// is called; tasks run in due order, ties broken by scheduling order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Move time forward by `by`, running every task that falls due,
    /// including tasks scheduled by tasks that run during the advance.
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        loop {
            let task = {
                let mut clock = self.clock.borrow_mut();
                let next = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);

                match next {
                    Some(index) => {
                        let pending = clock.queue.swap_remove(index);
                        clock.now = pending.due;
                        pending.task
                    }
                    None => break,
                }
            };

            task();
            ran += 1;
        }

        self.clock.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay: Duration, task: Task) {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + delay;
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.queue.push(Pending { due, seq, task });

        tracing::trace!(due_ms = due.as_millis() as u64, seq, "Deferred task");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_runs_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, name) in [(80, "sync"), (50, "check"), (50, "check-2")] {
            let log = Rc::clone(&log);
            scheduler.defer(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        assert_eq!(scheduler.advance(Duration::from_millis(49)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 2);
        assert_eq!(*log.borrow(), vec!["check", "check-2"]);
        assert_eq!(scheduler.advance(Duration::from_millis(100)), 1);
        assert_eq!(*log.borrow(), vec!["check", "check-2", "sync"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_nested_tasks_run_within_window() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = scheduler.clone();
        let inner_hits = Rc::clone(&hits);
        scheduler.defer(
            Duration::from_millis(80),
            Box::new(move || {
                let at = inner_scheduler.now();
                inner_hits.borrow_mut().push(at);
                let hits = Rc::clone(&inner_hits);
                let clock = inner_scheduler.clone();
                inner_scheduler.defer(
                    Duration::from_millis(50),
                    Box::new(move || hits.borrow_mut().push(clock.now())),
                );
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(200)), 2);
        assert_eq!(
            *hits.borrow(),
            vec![Duration::from_millis(80), Duration::from_millis(130)]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(200));
    }
}
