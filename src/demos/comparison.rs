//! Comparison coercion demo: parse two raw inputs, compare them loosely and
//! strictly, and show where the two equality rules disagree.

use crate::demo::{Demo, TriggerButton, render_error};
use crate::markup::{Markup, Table};
use crate::page::{Handle, Page};
use crate::scheduler::Scheduler;
use crate::value::Value;
use crate::{Error, Result};

pub const DEMO_ID: &str = "comparison-coercion";

const MAX_INPUT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Value,
    pub right: Value,
    pub loose: bool,
    pub strict: bool,
}

fn validated(raw: &str) -> Result<&str> {
    if raw.is_empty() {
        return Err(Error::Validation("Input value is required".to_string()));
    }
    if raw.chars().count() > MAX_INPUT_CHARS {
        return Err(Error::Validation(format!(
            "Input too long (max {MAX_INPUT_CHARS} chars)"
        )));
    }
    Ok(raw)
}

/// Pure computation step: validate, parse, compare both ways.
pub fn compare(raw1: &str, raw2: &str) -> Result<Comparison> {
    let left = Value::parse_input(validated(raw1)?);
    let right = Value::parse_input(validated(raw2)?);
    let loose = left.loose_equal(&right);
    let strict = left.strict_equal(&right);
    Ok(Comparison {
        left,
        right,
        loose,
        strict,
    })
}

fn render_report(report: &Comparison) -> Markup {
    let mut out = Markup::new();
    out.elem("h5", "Comparison Results:");

    let mut table = Table::new(&["Expression", "Result"]);
    table.row(vec![
        Markup::code("Value 1"),
        Markup::from_text(&format!(
            "{} ({})",
            report.left.display_text(),
            report.left.type_name()
        )),
    ]);
    table.row(vec![
        Markup::code("Value 2"),
        Markup::from_text(&format!(
            "{} ({})",
            report.right.display_text(),
            report.right.type_name()
        )),
    ]);
    let loose_class = if report.loose && report.strict {
        "table-success"
    } else if report.loose {
        "table-warning"
    } else {
        "table-danger"
    };
    table.classed_row(
        loose_class,
        vec![
            Markup::code(&format!(
                "{} == {} (Loose)",
                report.left.code_literal(),
                report.right.code_literal()
            )),
            Markup::from_text(if report.loose { "true" } else { "false" }),
        ],
    );
    let strict_class = if report.loose && report.strict {
        "table-success"
    } else {
        "table-danger"
    };
    table.classed_row(
        strict_class,
        vec![
            Markup::code(&format!(
                "{} === {} (Strict)",
                report.left.code_literal(),
                report.right.code_literal()
            )),
            Markup::from_text(if report.strict { "true" } else { "false" }),
        ],
    );
    out.append(&table.render());

    if report.loose != report.strict {
        out.open_with("div", &[("class", "alert alert-info mt-3")])
            .elem(
                "p",
                &format!(
                    "Notice: loose comparison (==) returned {} while strict comparison (===) returned {}.",
                    report.loose, report.strict
                ),
            )
            .elem(
                "p",
                "Loose comparison converts operand types before comparing; \
                 strict comparison requires both value and type to match.",
            )
            .close("div");
    }
    out
}

#[derive(Debug)]
pub struct ComparisonDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    input1: Option<Handle>,
    input2: Option<Handle>,
    busy: bool,
}

impl ComparisonDemo {
    pub fn new(page: &Page) -> Result<Self> {
        Ok(Self {
            button: Some(TriggerButton::resolve(
                page,
                "comparison-run",
                "Compare Values",
            )?),
            result: Some(page.resolve("comparison-result")?),
            input1: Some(page.resolve("comparison-value1")?),
            input2: Some(page.resolve("comparison-value2")?),
            busy: false,
        })
    }

    fn compute_markup(&self, page: &Page) -> Result<Markup> {
        let (Some(input1), Some(input2)) = (&self.input1, &self.input2) else {
            return Err(Error::Lifecycle("comparison demo is destroyed".to_string()));
        };
        let raw1 = page.value_of(input1.id())?;
        let raw2 = page.value_of(input2.id())?;
        let report = compare(&raw1, &raw2)?;
        Ok(render_report(&report))
    }
}

impl Demo for ComparisonDemo {
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
        self.input1 = None;
        self.input2 = None;
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_number_is_loose_but_not_strict_equal() -> Result<()> {
        let report = compare("5", "\"5\"")?;
        assert_eq!(report.left, Value::Num(5.0));
        assert_eq!(report.right, Value::Str("5".to_string()));
        assert!(report.loose);
        assert!(!report.strict);
        Ok(())
    }

    #[test]
    fn same_kind_values_agree_on_both_rules() -> Result<()> {
        let same = compare("1.5", "1.50")?;
        assert!(same.loose && same.strict);
        let different = compare("\"a\"", "\"b\"")?;
        assert!(!different.loose && !different.strict);
        Ok(())
    }

    #[test]
    fn empty_and_oversized_inputs_are_rejected() {
        assert!(matches!(compare("", "1"), Err(Error::Validation(_))));
        let long = "x".repeat(101);
        assert!(matches!(compare(&long, "1"), Err(Error::Validation(_))));
    }

    #[test]
    fn report_notes_disagreement_only_when_rules_differ() -> Result<()> {
        let differs = render_report(&compare("5", "\"5\"")?);
        assert!(differs.as_str().contains("alert-info"));
        assert!(differs.as_str().contains("5 == \"5\" (Loose)"));
        let agrees = render_report(&compare("5", "5")?);
        assert!(!agrees.as_str().contains("alert-info"));
        Ok(())
    }
}
