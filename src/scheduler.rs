//! Virtual-time timer queue. All simulated delays in the demos are tasks
//! here; nothing in the crate reads a wall clock. Tasks carry plain data
//! payloads and are dispatched back to the demo that scheduled them, so a
//! run can be replayed step by step.

use crate::{Error, Result};

/// Which attempt of the async demo's fetch pipeline a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAttempt {
    Initial,
    Recovery,
}

/// Sequencing style exercised by the timing demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencingStyle {
    Callbacks,
    Promises,
    AsyncAwait,
}

/// Payload delivered to a demo when one of its timers fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The simulated remote fetch settled.
    FetchSettled { attempt: FetchAttempt },
    /// The simulated processing stage settled.
    ProcessSettled { attempt: FetchAttempt },
    /// One delayed step of a sequencing-style timeline elapsed.
    SequenceStep { style: SequencingStyle, step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) demo: &'static str,
    pub(crate) event: TimerEvent,
}

/// Read-only snapshot of a queued timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub demo: &'static str,
}

const DEFAULT_STEP_LIMIT: usize = 10_000;

#[derive(Debug)]
pub struct Scheduler {
    now_ms: i64,
    next_timer_id: i64,
    next_order: i64,
    queue: Vec<ScheduledTask>,
    step_limit: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_timer_id: 1,
            next_order: 0,
            queue: Vec::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    pub fn set_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Lifecycle(
                "timer step limit must be at least 1".to_string(),
            ));
        }
        self.step_limit = max_steps;
        Ok(())
    }

    /// Queue an event for `demo` after `delay_ms` of virtual time. Negative
    /// delays clamp to zero, matching timer-API behavior.
    pub(crate) fn schedule(&mut self, delay_ms: i64, demo: &'static str, event: TimerEvent) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        self.queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms.max(0)),
            order,
            demo,
            event,
        });
        id
    }

    pub(crate) fn advance_clock(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Lifecycle(
                "advance_time requires non-negative milliseconds".to_string(),
            ));
        }
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        Ok(())
    }

    pub(crate) fn advance_clock_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.now_ms {
            return Err(Error::Lifecycle(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        self.now_ms = target_ms;
        Ok(())
    }

    /// Remove and return the next task in `(due_at, order)` order. With a
    /// due limit only tasks at or before the limit qualify; without one the
    /// clock jumps forward to the task's due time.
    pub(crate) fn take_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask> {
        let mut best: Option<usize> = None;
        for (idx, task) in self.queue.iter().enumerate() {
            if let Some(limit) = due_limit {
                if task.due_at > limit {
                    continue;
                }
            }
            best = match best {
                Some(current)
                    if (self.queue[current].due_at, self.queue[current].order)
                        <= (task.due_at, task.order) =>
                {
                    Some(current)
                }
                _ => Some(idx),
            };
        }
        let task = self.queue.remove(best?);
        if due_limit.is_none() && task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some(task)
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                demo: task.demo,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.queue.len();
        self.queue.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_due_then_order() {
        let mut scheduler = Scheduler::new();
        let step = TimerEvent::SequenceStep {
            style: SequencingStyle::Callbacks,
            step: 0,
        };
        scheduler.schedule(500, "b", step);
        scheduler.schedule(100, "a", step);
        scheduler.schedule(100, "c", step);
        scheduler.advance_clock(500).unwrap();
        let order: Vec<&str> = std::iter::from_fn(|| {
            scheduler
                .take_next(Some(scheduler.now_ms()))
                .map(|task| task.demo)
        })
        .collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn due_limit_holds_back_future_tasks() {
        let mut scheduler = Scheduler::new();
        let step = TimerEvent::SequenceStep {
            style: SequencingStyle::Promises,
            step: 1,
        };
        scheduler.schedule(1000, "later", step);
        assert!(scheduler.take_next(Some(scheduler.now_ms())).is_none());
        let task = scheduler.take_next(None).expect("task");
        assert_eq!(task.demo, "later");
        assert_eq!(scheduler.now_ms(), 1000);
    }

    #[test]
    fn negative_delay_clamps_and_negative_advance_errors() {
        let mut scheduler = Scheduler::new();
        let step = TimerEvent::SequenceStep {
            style: SequencingStyle::AsyncAwait,
            step: 2,
        };
        scheduler.schedule(-50, "now", step);
        assert_eq!(scheduler.pending_timers()[0].due_at, 0);
        assert!(matches!(
            scheduler.advance_clock(-1),
            Err(Error::Lifecycle(_))
        ));
        assert!(scheduler.set_step_limit(0).is_err());
    }
}
