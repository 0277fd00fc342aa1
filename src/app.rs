//! Lifecycle registry. [`App`] owns the page, the timer scheduler, the
//! progress tracker, and the seven demo units; it routes clicks to triggers,
//! drains due timers back to the unit that scheduled them, and records a
//! trace line for every lifecycle transition.

use crate::demo::Demo;
use crate::demos::{
    ArithmeticDemo, AsyncErrorDemo, CallbackTimingDemo, ComparisonDemo, MutableStateDemo,
    ScopePollutionDemo, ThisBindingDemo,
};
use crate::page::Page;
use crate::progress::ProgressTracker;
use crate::scheduler::{PendingTimer, ScheduledTask, Scheduler};
use crate::{Error, Result};

/// Section order on the standard page, first to last.
pub const SECTIONS: [&str; 7] = [
    "comparison-coercion",
    "arithmetic-coercion",
    "mutable-state",
    "async-recovery",
    "this-binding",
    "scope-pollution",
    "callback-timing",
];

pub struct App {
    page: Page,
    scheduler: Scheduler,
    tracker: Option<ProgressTracker>,
    demos: Vec<Box<dyn Demo>>,
    trace: Vec<String>,
}

impl App {
    /// Bring the page up: the progress tracker first, then every demo unit
    /// in section order. A construction failure is traced and stops the
    /// remaining units from being built; already-built units stay live.
    pub fn ready(page: Page) -> App {
        let mut app = App {
            page,
            scheduler: Scheduler::new(),
            tracker: None,
            demos: Vec::new(),
            trace: Vec::new(),
        };
        app.init();
        app
    }

    fn init(&mut self) {
        match ProgressTracker::new(&self.page, &SECTIONS) {
            Ok(tracker) => {
                self.tracker = Some(tracker);
                self.trace_line("[init] progress tracker ready".to_string());
            }
            Err(err) => {
                self.trace_line(format!("[init] progress tracker failed: {err}"));
                return;
            }
        }

        let outcome = ComparisonDemo::new(&self.page).map(boxed);
        if !self.register("comparison-coercion", outcome) {
            return;
        }
        let outcome = ArithmeticDemo::new(&mut self.page).map(boxed);
        if !self.register("arithmetic-coercion", outcome) {
            return;
        }
        let outcome = MutableStateDemo::new(&self.page).map(boxed);
        if !self.register("mutable-state", outcome) {
            return;
        }
        let outcome = AsyncErrorDemo::new(&self.page).map(boxed);
        if !self.register("async-recovery", outcome) {
            return;
        }
        let outcome = ThisBindingDemo::new(&self.page).map(boxed);
        if !self.register("this-binding", outcome) {
            return;
        }
        let outcome = ScopePollutionDemo::new(&self.page).map(boxed);
        if !self.register("scope-pollution", outcome) {
            return;
        }
        let outcome = CallbackTimingDemo::new(&self.page).map(boxed);
        self.register("callback-timing", outcome);
    }

    fn register(&mut self, id: &str, outcome: Result<Box<dyn Demo>>) -> bool {
        match outcome {
            Ok(demo) => {
                self.trace_line(format!("[init] demo {id} ready"));
                self.demos.push(demo);
                true
            }
            Err(err) => {
                self.trace_line(format!("[init] demo {id} failed: {err}"));
                false
            }
        }
    }

    /// Simulated click. Unknown elements are an error; clicks landing on a
    /// disabled element are dropped, matching browser behavior.
    pub fn click(&mut self, id: &str) -> Result<()> {
        self.page.resolve(id)?;
        if self.page.is_disabled(id)? {
            self.trace_line(format!("[click] {id} dropped (element disabled)"));
            return Ok(());
        }
        let Some(idx) = self
            .demos
            .iter()
            .position(|demo| demo.trigger_id() == Some(id))
        else {
            return Ok(());
        };
        self.demos[idx].trigger(&mut self.page, &mut self.scheduler);
        self.trace_line(format!("[click] {id} handled"));
        Ok(())
    }

    /// Simulated typing into an input element.
    pub fn set_value(&mut self, id: &str, value: &str) -> Result<()> {
        self.page.set_value(id, value)
    }

    /// Move virtual time forward and run every task that becomes due,
    /// including tasks scheduled by the tasks themselves.
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<usize> {
        let from = self.scheduler.now_ms();
        self.scheduler.advance_clock(delta_ms)?;
        let ran = self.run_due(Some(self.scheduler.now_ms()))?;
        self.trace_line(format!(
            "[timer] advance from={from} to={} ran={ran}",
            self.scheduler.now_ms()
        ));
        Ok(ran)
    }

    /// Absolute-target variant of [`App::advance_time`].
    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<usize> {
        let from = self.scheduler.now_ms();
        self.scheduler.advance_clock_to(target_ms)?;
        let ran = self.run_due(Some(self.scheduler.now_ms()))?;
        self.trace_line(format!("[timer] advance from={from} to={target_ms} ran={ran}"));
        Ok(ran)
    }

    /// Run the queue to exhaustion, jumping the clock to each task's due
    /// time. The scheduler's step limit bounds runaway chains.
    pub fn flush(&mut self) -> Result<usize> {
        let from = self.scheduler.now_ms();
        let ran = self.run_due(None)?;
        self.trace_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms()
        ));
        Ok(ran)
    }

    fn run_due(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(task) = self.scheduler.take_next(due_limit) {
            steps += 1;
            if steps > self.scheduler.step_limit() {
                return Err(Error::Lifecycle(format!(
                    "timer step limit exceeded ({} tasks)",
                    self.scheduler.step_limit()
                )));
            }
            self.dispatch(task);
        }
        Ok(steps)
    }

    fn dispatch(&mut self, task: ScheduledTask) {
        let Some(idx) = self.demos.iter().position(|demo| demo.id() == task.demo) else {
            self.trace_line(format!(
                "[timer] task {} for {} dropped (no live unit)",
                task.id, task.demo
            ));
            return;
        };
        self.demos[idx].on_timer(task.event, &mut self.page, &mut self.scheduler);
    }

    /// Section-visibility notification, forwarded to the progress tracker.
    pub fn reveal_section(&mut self, section_id: &str, visible_ratio: f64) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.section_visible(&mut self.page, section_id, visible_ratio);
        }
    }

    /// Destroy every unit and the tracker. Pending timers stay queued but
    /// their completions become no-ops; calling again is harmless.
    pub fn teardown(&mut self) {
        let mut lines = Vec::new();
        for demo in &mut self.demos {
            demo.teardown();
            lines.push(format!("[teardown] demo {} destroyed", demo.id()));
        }
        self.demos.clear();
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.teardown();
            lines.push("[teardown] progress tracker destroyed".to_string());
        }
        self.tracker = None;
        for line in lines {
            self.trace_line(line);
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.scheduler.pending_timers()
    }

    pub fn demo_count(&self) -> usize {
        self.demos.len()
    }

    pub fn demo(&self, id: &str) -> Option<&dyn Demo> {
        self.demos
            .iter()
            .find(|demo| demo.id() == id)
            .map(|demo| demo.as_ref())
    }

    pub fn current_section(&self) -> Option<usize> {
        self.tracker.as_ref().and_then(ProgressTracker::current_section)
    }

    /// Drain the accumulated trace lines.
    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace)
    }

    fn trace_line(&mut self, line: String) {
        self.trace.push(line);
    }
}

fn boxed<D: Demo + 'static>(demo: D) -> Box<dyn Demo> {
    Box::new(demo)
}
