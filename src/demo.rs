//! The demo lifecycle contract. Every unit moves through
//! `uninitialized → idle → busy → idle → destroyed`: construction resolves
//! all required elements or fails outright, the trigger handler brackets its
//! work with the busy indicator, and teardown releases every handle so later
//! timer completions become no-ops.

use crate::markup::Markup;
use crate::page::{Handle, Page};
use crate::scheduler::{Scheduler, TimerEvent};
use crate::{Error, Result};

/// Polymorphic demo unit held by the lifecycle registry.
pub trait Demo {
    fn id(&self) -> &'static str;

    /// Identifier of the bound trigger control; `None` once destroyed.
    fn trigger_id(&self) -> Option<&str>;

    /// Advisory busy flag, toggled at handler entry and exit.
    fn busy(&self) -> bool;

    /// Trigger handler: compute then render. Errors must not escape; they
    /// render into the unit's own result region instead.
    fn trigger(&mut self, page: &mut Page, timers: &mut Scheduler);

    /// Continuation of a simulated delay. Default: the unit never suspends.
    fn on_timer(&mut self, event: TimerEvent, page: &mut Page, timers: &mut Scheduler) {
        let _ = (event, page, timers);
    }

    /// Unbind the trigger and release every held element reference.
    /// Must tolerate being called more than once.
    fn teardown(&mut self);
}

/// Trigger control plus its idle label; owns the busy-indicator swap.
#[derive(Debug, Clone)]
pub(crate) struct TriggerButton {
    handle: Handle,
    idle_label: String,
}

impl TriggerButton {
    pub(crate) fn resolve(page: &Page, id: &str, idle_label: &str) -> Result<Self> {
        Ok(Self {
            handle: page.resolve(id)?,
            idle_label: idle_label.to_string(),
        })
    }

    pub(crate) fn id(&self) -> &str {
        self.handle.id()
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn set_busy(&self, page: &mut Page, busy: bool) {
        page.set_disabled(&self.handle, busy);
        if busy {
            let mut markup = Markup::new();
            markup
                .open_with("span", &[("class", "spinner-border spinner-border-sm")])
                .close("span")
                .text(" Processing...");
            page.set_html(&self.handle, &markup);
        } else {
            page.set_text(&self.handle, &self.idle_label);
        }
    }
}

/// Shared failure rendering: an escaped alert in the unit's result region.
pub(crate) fn render_error(page: &mut Page, region: &Handle, err: &Error) {
    let mut markup = Markup::new();
    markup
        .open_with("div", &[("class", "alert alert-danger")])
        .elem("strong", "Error:")
        .text(" ")
        .text(&err.to_string())
        .close("div");
    page.set_html(region, &markup);
}
