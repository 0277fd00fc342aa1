//! Mutable-state demo: appending through an aliased reference changes the
//! shared array, appending non-destructively leaves the original alone.

use std::cell::RefCell;
use std::rc::Rc;

use crate::demo::{Demo, TriggerButton, render_error};
use crate::markup::{Markup, Table};
use crate::page::{Handle, Page};
use crate::scheduler::Scheduler;
use crate::value::Literal;
use crate::{Error, Result};

pub const DEMO_ID: &str = "mutable-state";

const DEFAULT_ARRAY: &str = "[1, 2, 3]";
const DEFAULT_ITEM: &str = "4";

#[derive(Debug, Clone, PartialEq)]
pub struct MutationReport {
    pub original_before: Vec<Literal>,
    /// The shared array seen through the aliased reference after the append.
    pub aliased: Vec<Literal>,
    /// The same shared array seen through the original reference; identical
    /// to `aliased`, which is the point.
    pub original_after_alias: Vec<Literal>,
    pub preserved_original: Vec<Literal>,
    pub appended_copy: Vec<Literal>,
}

/// Pure computation step. The aliasing case goes through a genuinely shared
/// reference; the snapshots are taken from both ends of the alias.
pub fn demonstrate_mutation(initial: Vec<Literal>, item: Literal) -> MutationReport {
    let original_before = initial.clone();

    let original = Rc::new(RefCell::new(initial));
    let alias = Rc::clone(&original);
    alias.borrow_mut().push(item.clone());
    let aliased = alias.borrow().clone();
    let original_after_alias = original.borrow().clone();

    let preserved_original = original_before.clone();
    let appended_copy: Vec<Literal> = preserved_original
        .iter()
        .cloned()
        .chain(std::iter::once(item))
        .collect();

    MutationReport {
        original_before,
        aliased,
        original_after_alias,
        preserved_original,
        appended_copy,
    }
}

fn stringify(items: &[Literal]) -> String {
    Literal::Array(items.to_vec()).to_string()
}

fn parse_array_input(raw: &str) -> Result<Vec<Literal>> {
    let source = if raw.trim().is_empty() {
        DEFAULT_ARRAY
    } else {
        raw
    };
    match Literal::parse(source)? {
        Literal::Array(items) => Ok(items),
        _ => Err(Error::Validation(
            "Expected an array literal like [1, 2, 3]".to_string(),
        )),
    }
}

fn parse_item_input(raw: &str) -> Result<Literal> {
    let source = if raw.trim().is_empty() {
        DEFAULT_ITEM
    } else {
        raw
    };
    Literal::parse(source)
}

fn render_report(report: &MutationReport) -> Markup {
    let mut out = Markup::new();
    out.elem("h5", "Mutation Comparison:");

    let mut table = Table::new(&[
        "Operation",
        "Original Before",
        "Result Array",
        "Original After",
        "Side Effects",
    ]);
    table.classed_row(
        "table-danger",
        vec![
            Markup::code("Aliased Update"),
            Markup::from_text(&stringify(&report.original_before)),
            Markup::from_text(&stringify(&report.aliased)),
            Markup::from_text(&stringify(&report.original_after_alias)),
            Markup::from_text("Original array modified"),
        ],
    );
    table.classed_row(
        "table-success",
        vec![
            Markup::code("Non-destructive Update"),
            Markup::from_text(&stringify(&report.preserved_original)),
            Markup::from_text(&stringify(&report.appended_copy)),
            Markup::from_text(&stringify(&report.preserved_original)),
            Markup::from_text("Original array preserved"),
        ],
    );
    out.append(&table.render());

    out.open_with("div", &[("class", "alert alert-info mt-3")])
        .elem("h6", "Key Takeaways:")
        .open("ul")
        .elem(
            "li",
            "An aliased reference and the original point at the same array, \
             so an in-place append is visible through both",
        )
        .elem(
            "li",
            "A non-destructive append builds a fresh array and leaves the \
             original untouched",
        )
        .elem(
            "li",
            "Prefer returning new arrays over mutating shared ones",
        )
        .close("ul")
        .close("div");
    out
}

#[derive(Debug)]
pub struct MutableStateDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    array_input: Option<Handle>,
    item_input: Option<Handle>,
    busy: bool,
}

impl MutableStateDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(page, "mutable-run", "Mutate Array")?),
            result: Some(page.resolve("mutable-result")?),
            array_input: Some(page.resolve("mutable-array")?),
            item_input: Some(page.resolve("mutable-item")?),
            busy: false,
        })
    }

    fn compute_markup(&self, page: &Page) -> Result<Markup> {
        let (Some(array_input), Some(item_input)) = (&self.array_input, &self.item_input) else {
            return Err(Error::Lifecycle(
                "mutable-state demo is destroyed".to_string(),
            ));
        };
        let initial = parse_array_input(&page.value_of(array_input.id())?)?;
        let item = parse_item_input(&page.value_of(item_input.id())?)?;
        let report = demonstrate_mutation(initial, item);
        Ok(render_report(&report))
    }
}

impl Demo for MutableStateDemo {
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
        match self.compute_markup(page) {
            Ok(markup) => page.set_html(&result, &markup),
            Err(err) => render_error(page, &result, &err),
        }
        button.set_busy(page, false);
        self.busy = false;
    }

    fn teardown(&mut self) {
        self.button = None;
        self.result = None;
        self.array_input = None;
        self.item_input = None;
        self.busy = false;
    }
}
