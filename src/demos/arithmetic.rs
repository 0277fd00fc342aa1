//! Arithmetic coercion demo: the same operand pair evaluated as raw strings
//! and after numeric conversion, side by side.

use crate::demo::{Demo, TriggerButton, render_error};
use crate::markup::{Markup, Table};
use crate::page::{Handle, Page};
use crate::scheduler::Scheduler;
use crate::value::{format_number, js_to_number};
use crate::{Error, Result};

pub const DEMO_ID: &str = "arithmetic-coercion";

const NUMERIC_PATTERN: &str = r"^-?\d*\.?\d*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            _ => Err(Error::Computation("Invalid operator".to_string())),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    fn explanation(self) -> &'static str {
        match self {
            Self::Add => {
                "concatenates strings when + meets string operands, \
                 but adds numbers once both sides are converted"
            }
            Self::Sub => {
                "coerces strings to numbers for -, since subtraction \
                 is only defined on numbers"
            }
            Self::Mul => {
                "coerces strings to numbers for *, since multiplication \
                 is only defined on numbers"
            }
            Self::Div => {
                "coerces strings to numbers for /, since division \
                 is only defined on numbers"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub left_raw: String,
    pub right_raw: String,
    pub left_num: f64,
    pub right_num: f64,
    pub op: Operator,
    /// What the expression yields without conversion: concatenation for `+`,
    /// otherwise the literal expression text.
    pub non_coerced: String,
    pub coerced: f64,
}

fn numeric_pattern() -> Result<fancy_regex::Regex> {
    fancy_regex::Regex::new(NUMERIC_PATTERN)
        .map_err(|err| Error::Lifecycle(format!("numeric pattern failed to compile: {err}")))
}

fn validate_number<'a>(pattern: &fancy_regex::Regex, raw: &'a str) -> Result<&'a str> {
    if raw.is_empty() {
        return Err(Error::Validation("Input value is required".to_string()));
    }
    if !matches!(pattern.is_match(raw.trim()), Ok(true)) {
        return Err(Error::Validation(
            "Please enter a valid number".to_string(),
        ));
    }
    Ok(raw)
}

/// Pure computation step: validate both operands, resolve the operator, and
/// evaluate the non-coerced and coerced forms. Division by zero yields
/// positive infinity, never an error.
pub fn calculate(raw1: &str, raw2: &str, op_raw: &str) -> Result<Calculation> {
    let pattern = numeric_pattern()?;
    let left_raw = validate_number(&pattern, raw1)?.to_string();
    let right_raw = validate_number(&pattern, raw2)?.to_string();
    let op = Operator::parse(op_raw)?;

    let left_num = js_to_number(&left_raw);
    let right_num = js_to_number(&right_raw);

    let non_coerced = match op {
        Operator::Add => format!("{left_raw}{right_raw}"),
        _ => format!("{left_raw}{}{right_raw}", op.symbol()),
    };
    let coerced = match op {
        Operator::Add => left_num + right_num,
        Operator::Sub => left_num - right_num,
        Operator::Mul => left_num * right_num,
        Operator::Div => {
            if right_num == 0.0 {
                f64::INFINITY
            } else {
                left_num / right_num
            }
        }
    };

    Ok(Calculation {
        left_raw,
        right_raw,
        left_num,
        right_num,
        op,
        non_coerced,
        coerced,
    })
}

fn badge(class: &str, label: &str) -> Markup {
    let mut markup = Markup::new();
    markup
        .open_with("span", &[("class", class)])
        .text(label)
        .close("span");
    markup
}

fn render_report(report: &Calculation) -> Markup {
    let symbol = report.op.symbol();
    let coerced_text = format_number(report.coerced);

    let mut out = Markup::new();
    out.elem("h5", "Type Coercion Demonstration:");

    let mut table = Table::new(&["Stage", "Expression", "Result", "Type"]);
    table.classed_row(
        "table-warning",
        vec![
            Markup::from_text("Original Input"),
            Markup::code(&format!(
                "{} {symbol} {}",
                report.left_raw, report.right_raw
            )),
            Markup::from_text(&report.non_coerced),
            badge("badge bg-secondary", "string"),
        ],
    );
    table.classed_row(
        "table-info",
        vec![
            Markup::from_text("After Numeric Conversion"),
            Markup::code(&format!(
                "{} {symbol} {}",
                format_number(report.left_num),
                format_number(report.right_num)
            )),
            Markup::from_text(&coerced_text),
            badge("badge bg-primary", "number"),
        ],
    );
    out.append(&table.render());

    out.open_with("div", &[("class", "alert alert-info mt-3")])
        .elem("h6", "Type Coercion Explanation:")
        .elem(
            "p",
            &format!(
                "Without numeric conversion: \"{}\" (string)",
                report.non_coerced
            ),
        )
        .elem(
            "p",
            &format!("With numeric conversion: {coerced_text} (number)"),
        )
        .elem(
            "p",
            &format!("Notice how the runtime {}", report.op.explanation()),
        )
        .close("div");
    out
}

#[derive(Debug)]
pub struct ArithmeticDemo {
    button: Option<TriggerButton>,
    result: Option<Handle>,
    input1: Option<Handle>,
    input2: Option<Handle>,
    operator: Option<Handle>,
    form: Option<Handle>,
    busy: bool,
}

impl ArithmeticDemo {
    /// Resolves the form's elements and applies its accessibility
    /// attributes, which is why construction needs a mutable page.
    pub fn new(page: &mut Page) -> Result<Self> {
        let button = TriggerButton::resolve(page, "arithmetic-run", "Calculate")?;
        let result = page.resolve("arithmetic-result")?;
        let input1 = page.resolve("arithmetic-value1")?;
        let input2 = page.resolve("arithmetic-value2")?;
        let operator = page.resolve("arithmetic-operator")?;
        let form = page.resolve("arithmetic-form")?;

        page.set_attr(&form, "aria-label", "Arithmetic type coercion demonstration");
        page.set_attr(&result, "role", "region");
        page.set_attr(&result, "aria-live", "polite");
        page.set_attr(&result, "aria-atomic", "true");
        page.set_attr(&input1, "aria-describedby", "arithmetic-value1-help");
        page.set_attr(&input2, "aria-describedby", "arithmetic-value2-help");
        page.set_attr(&operator, "aria-label", "Arithmetic operator");
        page.set_attr(
            button.handle(),
            "aria-label",
            "Calculate and demonstrate type coercion",
        );

        Ok(Self {
            button: Some(button),
            result: Some(result),
            input1: Some(input1),
            input2: Some(input2),
            operator: Some(operator),
            form: Some(form),
            busy: false,
        })
    }

    fn compute_markup(&self, page: &Page) -> Result<Markup> {
        let (Some(input1), Some(input2), Some(operator)) =
            (&self.input1, &self.input2, &self.operator)
        else {
            return Err(Error::Lifecycle("arithmetic demo is destroyed".to_string()));
        };
        let raw1 = page.value_of(input1.id())?;
        let raw2 = page.value_of(input2.id())?;
        let op_raw = page.value_of(operator.id())?;
        let report = calculate(&raw1, &raw2, &op_raw)?;
        Ok(render_report(&report))
    }
}

impl Demo for ArithmeticDemo {
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
        self.operator = None;
        self.form = None;
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_concatenates_raw_and_adds_coerced() -> Result<()> {
        let report = calculate("5", "3", "+")?;
        assert_eq!(report.non_coerced, "53");
        assert_eq!(report.coerced, 8.0);
        Ok(())
    }

    #[test]
    fn division_by_zero_is_positive_infinity() -> Result<()> {
        let report = calculate("5", "0", "/")?;
        assert_eq!(report.coerced, f64::INFINITY);
        assert_eq!(format_number(report.coerced), "Infinity");
        let zero_over_zero = calculate("0", "0", "/")?;
        assert_eq!(zero_over_zero.coerced, f64::INFINITY);
        Ok(())
    }

    #[test]
    fn non_plus_operators_show_the_literal_expression() -> Result<()> {
        let report = calculate("5", "3", "-")?;
        assert_eq!(report.non_coerced, "5-3");
        assert_eq!(report.coerced, 2.0);
        Ok(())
    }

    #[test]
    fn invalid_operator_is_a_computation_error() {
        assert_eq!(
            calculate("5", "3", "%"),
            Err(Error::Computation("Invalid operator".to_string()))
        );
    }

    #[test]
    fn malformed_operands_are_validation_errors() {
        assert!(matches!(calculate("", "3", "+"), Err(Error::Validation(_))));
        assert!(matches!(
            calculate("5", "abc", "+"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            calculate("1.2.3", "1", "+"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn lone_minus_passes_the_pattern_and_coerces_to_nan() -> Result<()> {
        let report = calculate("-", "3", "*")?;
        assert!(report.coerced.is_nan());
        assert_eq!(format_number(report.coerced), "NaN");
        Ok(())
    }

    #[test]
    fn report_renders_both_stages() -> Result<()> {
        let html = render_report(&calculate("5", "3", "+")?);
        assert!(html.as_str().contains("<code>5 + 3</code>"));
        assert!(html.as_str().contains("<td>53</td>"));
        assert!(html.as_str().contains("<td>8</td>"));
        assert!(html.as_str().contains("badge bg-primary"));
        Ok(())
    }
}
