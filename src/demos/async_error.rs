//! Async error demo: a simulated fetch-then-process pipeline that fails on
//! the first attempt, displays the failure with its stack block, and then
//! recovers through the same pipeline.

use crate::demo::{Demo, TriggerButton};
use crate::markup::Markup;
use crate::page::{Handle, Page};
use crate::scheduler::{FetchAttempt, Scheduler, TimerEvent};
use crate::{Error, Result};

pub const DEMO_ID: &str = "async-recovery";

const FETCH_DELAY_MS: i64 = 1000;
const PROCESS_DELAY_MS: i64 = 500;

const SIMULATED_STACK: [&str; 3] = [
    "at fetch_user_data",
    "at run_pipeline",
    "at trigger_handler",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserRecord {
    pub(crate) id: u32,
    pub(crate) name: String,
}

pub(crate) fn fetch_user_data(should_fail: bool) -> Result<UserRecord> {
    if should_fail {
        return Err(Error::SimulatedRemote(
            "Network error: Failed to fetch user data".to_string(),
        ));
    }
    Ok(UserRecord {
        id: 1,
        name: "John Doe".to_string(),
    })
}

pub(crate) fn process_user_data(record: &UserRecord, should_fail: bool) -> Result<String> {
    if should_fail {
        return Err(Error::SimulatedRemote(
            "Processing error: Invalid data format".to_string(),
        ));
    }
    Ok(format!("Processed {}'s information", record.name))
}

#[derive(Debug)]
pub struct AsyncErrorDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    failure: Option<Handle>,
    busy: bool,
    fail_recovery: bool,
}

impl AsyncErrorDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(
                page,
                "async-run",
                "Trigger Async Operation",
            )?),
            result: Some(page.resolve("async-result")?),
            failure: Some(page.resolve("async-failure")?),
            busy: false,
            fail_recovery: false,
        })
    }

    /// Test hook: make the recovery fetch fail too, exercising the
    /// appended-secondary-failure path.
    pub fn inject_recovery_failure(&mut self, fail: bool) {
        self.fail_recovery = fail;
    }

    fn render_failure(page: &mut Page, region: &Handle, err: &Error) {
        let mut markup = Markup::new();
        markup
            .elem("strong", "Original Error:")
            .text(&format!(" {err}"))
            .line_break()
            .open_with("small", &[("class", "text-muted")])
            .text("Stack trace:");
        for frame in SIMULATED_STACK {
            markup.line_break().text(frame);
        }
        markup.close("small");
        page.set_html(region, &markup);
        page.toggle_class(region, "d-none", false);
    }

    fn finish(&mut self, page: &mut Page, button: &TriggerButton) {
        button.set_busy(page, false);
        self.busy = false;
    }
}

impl Demo for AsyncErrorDemo {
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
        let (Some(button), Some(result), Some(failure)) = (
            self.button.clone(),
            self.result.clone(),
            self.failure.clone(),
        ) else {
            return;
        };
        page.toggle_class(&result, "d-none", true);
        page.toggle_class(&failure, "d-none", true);
        self.busy = true;
        button.set_busy(page, true);
        timers.schedule(
            FETCH_DELAY_MS,
            DEMO_ID,
            TimerEvent::FetchSettled {
                attempt: FetchAttempt::Initial,
            },
        );
    }

    fn on_timer(&mut self, event: TimerEvent, page: &mut Page, timers: &mut Scheduler) {
        // Liveness check: after teardown a late completion must write nothing.
        let (Some(button), Some(result), Some(failure)) = (
            self.button.clone(),
            self.result.clone(),
            self.failure.clone(),
        ) else {
            return;
        };
        match event {
            TimerEvent::FetchSettled {
                attempt: FetchAttempt::Initial,
            } => {
                // Fixed scenario: the first attempt always fails.
                if let Err(err) = fetch_user_data(true) {
                    Self::render_failure(page, &failure, &err);
                    timers.schedule(
                        FETCH_DELAY_MS,
                        DEMO_ID,
                        TimerEvent::FetchSettled {
                            attempt: FetchAttempt::Recovery,
                        },
                    );
                }
            }
            TimerEvent::FetchSettled {
                attempt: FetchAttempt::Recovery,
            } => match fetch_user_data(self.fail_recovery) {
                Ok(_) => {
                    timers.schedule(
                        PROCESS_DELAY_MS,
                        DEMO_ID,
                        TimerEvent::ProcessSettled {
                            attempt: FetchAttempt::Recovery,
                        },
                    );
                }
                Err(_) => {
                    page.append_text(&failure, "\nRecovery attempt also failed!");
                    self.finish(page, &button);
                }
            },
            TimerEvent::ProcessSettled {
                attempt: FetchAttempt::Recovery,
            } => {
                let outcome = fetch_user_data(false)
                    .and_then(|record| process_user_data(&record, false));
                match outcome {
                    Ok(message) => {
                        page.set_text(&result, &format!("Recovery successful: {message}"));
                        page.toggle_class(&result, "d-none", false);
                    }
                    Err(_) => {
                        page.append_text(&failure, "\nRecovery attempt also failed!");
                    }
                }
                self.finish(page, &button);
            }
            _ => {}
        }
    }

    fn teardown(&mut self) {
        self.button = None;
        self.result = None;
        self.failure = None;
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_carries_the_network_message() {
        assert_eq!(
            fetch_user_data(true),
            Err(Error::SimulatedRemote(
                "Network error: Failed to fetch user data".to_string()
            ))
        );
    }

    #[test]
    fn successful_pipeline_produces_the_processed_message() -> Result<()> {
        let record = fetch_user_data(false)?;
        assert_eq!(record.id, 1);
        assert_eq!(
            process_user_data(&record, false)?,
            "Processed John Doe's information"
        );
        Ok(())
    }

    #[test]
    fn processing_failure_carries_the_format_message() -> Result<()> {
        let record = fetch_user_data(false)?;
        assert!(matches!(
            process_user_data(&record, true),
            Err(Error::SimulatedRemote(_))
        ));
        Ok(())
    }
}
