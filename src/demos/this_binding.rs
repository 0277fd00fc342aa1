//! Context binding demo: a context-sensitive function resolves its owner at
//! call time and loses it when detached; a context-captured closure keeps the
//! owner it closed over no matter how it is called.

use crate::demo::{Demo, TriggerButton};
use crate::markup::Markup;
use crate::page::{Handle, Page};
use crate::scheduler::Scheduler;
use crate::Result;

pub const DEMO_ID: &str = "this-binding";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingReport {
    pub sensitive_direct: String,
    pub sensitive_detached: String,
    pub captured_direct: String,
    pub captured_detached: String,
}

struct Greeter {
    name: String,
}

/// Pure computation step: the same greeting evaluated in four ways.
pub fn demonstrate_binding() -> BindingReport {
    // Context-sensitive: the owner is looked up at every call.
    let greet = |owner: Option<&Greeter>| match owner {
        Some(owner) => format!("Hello, my name is {}", owner.name),
        None => "<no context>".to_string(),
    };
    let alice = Greeter {
        name: "Alice".to_string(),
    };
    let sensitive_direct = greet(Some(&alice));
    let sensitive_detached = greet(None);

    // Context-captured: the owner's name is fixed at definition time.
    let bob = Greeter {
        name: "Bob".to_string(),
    };
    let captured_name = bob.name.clone();
    let greet_captured = move || format!("Hello, my name is {captured_name}");
    let captured_direct = greet_captured();
    let detached: Box<dyn Fn() -> String> = Box::new(greet_captured);
    drop(bob);
    let captured_detached = detached();

    BindingReport {
        sensitive_direct,
        sensitive_detached,
        captured_direct,
        captured_detached,
    }
}

fn outcome_cell(out: &mut Markup, retained: bool, text: &str) {
    let class = if retained {
        "table-success"
    } else {
        "table-danger"
    };
    out.open_with("td", &[("class", class)]).text(text).close("td");
}

fn render_report(report: &BindingReport) -> Markup {
    let mut out = Markup::new();
    out.elem("h5", "Context Binding Behavior:");
    out.open_with("table", &[("class", "table table-bordered")])
        .open("thead")
        .open("tr")
        .elem("th", "Function Kind")
        .elem("th", "Direct Call")
        .elem("th", "Detached Call")
        .close("tr")
        .close("thead")
        .open("tbody");

    out.open("tr").open("td");
    out.append(&Markup::code("Context-sensitive")).close("td");
    outcome_cell(&mut out, true, &report.sensitive_direct);
    outcome_cell(&mut out, false, &report.sensitive_detached);
    out.close("tr");

    out.open("tr").open("td");
    out.append(&Markup::code("Context-captured")).close("td");
    outcome_cell(&mut out, true, &report.captured_direct);
    outcome_cell(&mut out, true, &report.captured_detached);
    out.close("tr");

    out.close("tbody").close("table");

    out.open_with("div", &[("class", "alert alert-info mt-3")])
        .elem("h6", "Key Takeaways:")
        .open("ul")
        .elem(
            "li",
            "A context-sensitive function resolves its owner at call time, \
             so how it is called decides what it sees",
        )
        .elem(
            "li",
            "Detaching a context-sensitive function loses the owner entirely",
        )
        .elem(
            "li",
            "A context-captured function fixes its owner at definition time \
             and keeps it even when detached",
        )
        .close("ul")
        .close("div");
    out
}

#[derive(Debug)]
pub struct ThisBindingDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    busy: bool,
}

impl ThisBindingDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(page, "this-run", "Run Demo")?),
            result: Some(page.resolve("this-result")?),
            busy: false,
        })
    }
}

impl Demo for ThisBindingDemo {
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
        let report = demonstrate_binding();
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
    fn detached_sensitive_call_loses_its_owner() {
        let report = demonstrate_binding();
        assert_eq!(report.sensitive_direct, "Hello, my name is Alice");
        assert_eq!(report.sensitive_detached, "<no context>");
    }

    #[test]
    fn captured_call_keeps_its_owner_when_detached() {
        let report = demonstrate_binding();
        assert_eq!(report.captured_direct, "Hello, my name is Bob");
        assert_eq!(report.captured_detached, "Hello, my name is Bob");
    }

    #[test]
    fn placeholder_is_escaped_in_the_rendered_table() {
        let html = render_report(&demonstrate_binding());
        assert!(html.as_str().contains("&lt;no context&gt;"));
        assert!(!html.as_str().contains("<no context>"));
    }
}
