//! Scope pollution demo: three counters under three scoping disciplines —
//! ambient, block-shadowed, and closure-encapsulated.

use crate::Result;
use crate::demo::{Demo, TriggerButton};
use crate::markup::{Markup, Table};
use crate::page::{Handle, Page};
use crate::scheduler::Scheduler;

pub const DEMO_ID: &str = "scope-pollution";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeReport {
    /// Counter visible and mutable from the surrounding scope.
    pub ambient: i64,
    /// Outer counter after an inner shadow came and went.
    pub shadowed: i64,
    /// Counter reachable only through an exposed increment operation.
    pub encapsulated: i64,
}

/// Pure computation step: run all three disciplines once.
pub fn demonstrate_scoping() -> ScopeReport {
    let mut ambient_counter = 0;
    ambient_counter += 1;
    let ambient = ambient_counter;

    let block_counter = 0;
    {
        // Shadow, not reassignment; dies with the block.
        let block_counter = 10;
        let _ = block_counter;
    }
    let shadowed = block_counter;

    let mut hidden_counter = 0;
    let mut increment = move || {
        hidden_counter += 1;
        hidden_counter
    };
    let encapsulated = increment();

    ScopeReport {
        ambient,
        shadowed,
        encapsulated,
    }
}

fn render_report(report: &ScopeReport) -> Markup {
    let mut out = Markup::new();
    out.elem("h5", "Scope Behavior Demonstration:");

    let mut table = Table::new(&["Scope Kind", "Value", "Explanation"]);
    table.classed_row(
        "table-danger",
        vec![
            Markup::code("ambient"),
            Markup::from_text(&report.ambient.to_string()),
            Markup::from_text("Visible and mutable from the surrounding scope"),
        ],
    );
    table.classed_row(
        "table-success",
        vec![
            Markup::code("block shadow"),
            Markup::from_text(&report.shadowed.to_string()),
            Markup::from_text("Inner shadow stayed in its block; the outer value is unchanged"),
        ],
    );
    table.classed_row(
        "table-success",
        vec![
            Markup::code("closure"),
            Markup::from_text(&report.encapsulated.to_string()),
            Markup::from_text("Hidden behind a closure; only the exposed increment reaches it"),
        ],
    );
    out.append(&table.render());

    out.open_with("div", &[("class", "alert alert-info mt-3")])
        .elem("h6", "Key Takeaways:")
        .open("ul")
        .elem(
            "li",
            "Ambient counters can be modified from anywhere in the \
             surrounding scope",
        )
        .elem(
            "li",
            "Block-scoped shadows cannot leak into the outer scope",
        )
        .elem(
            "li",
            "Closures give real privacy: state is reachable only through \
             the operations deliberately exposed",
        )
        .close("ul")
        .close("div");
    out
}

#[derive(Debug)]
pub struct ScopePollutionDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    busy: bool,
}

impl ScopePollutionDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(page, "scope-run", "Run Demo")?),
            result: Some(page.resolve("scope-result")?),
            busy: false,
        })
    }
}

impl Demo for ScopePollutionDemo {
    fn id(&self) -> &'static str {
        DEMO_ID
    }

    fn trigger_id(&self) -> Option<&str> {
        self.button.as_ref().map(|button| button.id())
    }

    fn busy(&self) -> bool {
        self.busy
    }

    fn trigger(&mut self, page: &mut Page, _timers: &mut Scheduler) {
        let (Some(button), Some(result)) = (self.button.clone(), self.result.clone()) else {
            return;
        };
        self.busy = true;
        button.set_busy(page, true);
        let report = demonstrate_scoping();
        page.set_html(&result, &render_report(&report));
        button.set_busy(page, false);
        self.busy = false;
    }

    fn teardown(&mut self) {
        self.button = None;
        self.result = None;
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_three_disciplines_yield_their_expected_counts() {
        let report = demonstrate_scoping();
        assert_eq!(report.ambient, 1);
        assert_eq!(report.shadowed, 0);
        assert_eq!(report.encapsulated, 1);
    }

    #[test]
    fn report_renders_one_row_per_discipline() {
        let html = render_report(&demonstrate_scoping());
        assert!(html.as_str().contains("<code>ambient</code>"));
        assert!(html.as_str().contains("<code>block shadow</code>"));
        assert!(html.as_str().contains("<code>closure</code>"));
    }
}
