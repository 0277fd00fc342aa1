//! Sequencing-style demo: the same three delayed steps run under nested
//! callbacks, chained promises, and sequential awaiting, with the elapsed
//! virtual time recorded at each step.

use crate::Result;
use crate::demo::{Demo, TriggerButton};
use crate::markup::{Markup, Table};
use crate::page::{Handle, Page};
use crate::scheduler::{Scheduler, SequencingStyle, TimerEvent};

pub const DEMO_ID: &str = "callback-timing";

const STEP_DELAY_MS: i64 = 1000;
const STEP_LABELS: [&str; 3] = ["First task", "Second task", "Third task"];

impl SequencingStyle {
    pub(crate) const ALL: [SequencingStyle; 3] = [
        SequencingStyle::Callbacks,
        SequencingStyle::Promises,
        SequencingStyle::AsyncAwait,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Callbacks => 0,
            Self::Promises => 1,
            Self::AsyncAwait => 2,
        }
    }

    fn next(self) -> Option<SequencingStyle> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Callbacks => "Callbacks",
            Self::Promises => "Promises",
            Self::AsyncAwait => "Async/Await",
        }
    }

    fn code_shape(self) -> &'static str {
        match self {
            Self::Callbacks => "Nested, hard to follow",
            Self::Promises => "Linear chains, better flow",
            Self::AsyncAwait => "Clean, synchronous style",
        }
    }

    fn row_class(self) -> &'static str {
        match self {
            Self::Callbacks => "table-danger",
            Self::Promises => "table-warning",
            Self::AsyncAwait => "table-success",
        }
    }
}

#[derive(Debug)]
struct TimingRun {
    /// Start of the style currently executing; each style measures its own
    /// elapsed times from zero.
    style_started_at: i64,
    timelines: [Vec<String>; 3],
}

fn render_report(timelines: &[Vec<String>; 3]) -> Markup {
    let mut out = Markup::new();
    out.elem("h5", "Sequencing Style Comparison:");

    let mut table = Table::new(&["Pattern", "Execution Timeline", "Code Style"]);
    for style in SequencingStyle::ALL {
        let mut timeline = Markup::new();
        for (idx, line) in timelines[style.index()].iter().enumerate() {
            if idx > 0 {
                timeline.line_break();
            }
            timeline.text(line);
        }
        table.classed_row(
            style.row_class(),
            vec![
                Markup::code(style.label()),
                timeline,
                Markup::from_text(style.code_shape()),
            ],
        );
    }
    out.append(&table.render());

    out.open_with("div", &[("class", "alert alert-info mt-3")])
        .elem("h6", "Key Takeaways:")
        .open("ul")
        .elem("li", "Callback nesting creates a pyramid of doom")
        .elem("li", "Promise chains keep the steps linear and compose errors")
        .elem("li", "Sequential awaiting reads like synchronous code")
        .elem(
            "li",
            "All three styles complete on the same timeline; only the code \
             shape differs",
        )
        .close("ul")
        .close("div");
    out
}

#[derive(Debug)]
pub struct CallbackTimingDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    busy: bool,
    run: Option<TimingRun>,
}

impl CallbackTimingDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(page, "timing-run", "Run Tasks")?),
            result: Some(page.resolve("timing-result")?),
            busy: false,
            run: None,
        })
    }
}

impl Demo for CallbackTimingDemo {
    fn id(&self) -> &'static str {
        DEMO_ID
    }

    fn trigger_id(&self) -> Option<&str> {
        self.button.as_ref().map(|button| button.id())
    }

    fn busy(&self) -> bool {
        self.busy
    }

    fn trigger(&mut self, page: &mut Page, timers: &mut Scheduler) {
        let Some(button) = self.button.clone() else {
            return;
        };
        self.busy = true;
        button.set_busy(page, true);
        self.run = Some(TimingRun {
            style_started_at: timers.now_ms(),
            timelines: Default::default(),
        });
        timers.schedule(
            STEP_DELAY_MS,
            DEMO_ID,
            TimerEvent::SequenceStep {
                style: SequencingStyle::Callbacks,
                step: 0,
            },
        );
    }

    fn on_timer(&mut self, event: TimerEvent, page: &mut Page, timers: &mut Scheduler) {
        // Liveness check: after teardown a late step must write nothing.
        let (Some(button), Some(result)) = (self.button.clone(), self.result.clone()) else {
            return;
        };
        let TimerEvent::SequenceStep { style, step } = event else {
            return;
        };
        let Some(run) = self.run.as_mut() else {
            return;
        };

        let elapsed = timers.now_ms() - run.style_started_at;
        run.timelines[style.index()].push(format!("{}: {elapsed}ms", STEP_LABELS[step]));

        if step + 1 < STEP_LABELS.len() {
            timers.schedule(
                STEP_DELAY_MS,
                DEMO_ID,
                TimerEvent::SequenceStep {
                    style,
                    step: step + 1,
                },
            );
        } else if let Some(next_style) = style.next() {
            run.style_started_at = timers.now_ms();
            timers.schedule(
                STEP_DELAY_MS,
                DEMO_ID,
                TimerEvent::SequenceStep {
                    style: next_style,
                    step: 0,
                },
            );
        } else {
            let timelines = std::mem::take(&mut run.timelines);
            self.run = None;
            page.set_html(&result, &render_report(&timelines));
            button.set_busy(page, false);
            self.busy = false;
        }
    }

    fn teardown(&mut self) {
        self.button = None;
        self.result = None;
        self.run = None;
        self.busy = false;
    }
}
