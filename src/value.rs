//! Scalar and literal models with JavaScript-faithful coercion: the demos
//! exist to show these rules off, so the equality ladder and number
//! formatting follow the ECMAScript behavior rather than Rust's.

use crate::{Error, Result};

/// Two-kind scalar produced from raw demo input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
}

impl Value {
    /// Input parse rule: double-quoted text is a literal string with the
    /// quotes stripped; otherwise anything ToNumber accepts is a number;
    /// everything else stays a string.
    pub fn parse_input(raw: &str) -> Value {
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return Value::Str(raw[1..raw.len() - 1].to_string());
        }
        let number = js_to_number(raw);
        if number.is_nan() {
            Value::Str(raw.to_string())
        } else {
            Value::Num(number)
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Num(_) => "number",
            Self::Str(_) => "string",
        }
    }

    /// Loose equality: same-kind values compare directly, mixed kinds
    /// compare after coercing the string side to a number.
    pub fn loose_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Num(a), Self::Str(b)) => *a == js_to_number(b),
            (Self::Str(a), Self::Num(b)) => js_to_number(a) == *b,
        }
    }

    /// Strict equality: kind and value must both match, no coercion.
    pub fn strict_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Bare rendering for result cells.
    pub fn display_text(&self) -> String {
        match self {
            Self::Num(n) => format_number(*n),
            Self::Str(s) => s.clone(),
        }
    }

    /// Source-shaped rendering for expression cells: strings keep quotes.
    pub fn code_literal(&self) -> String {
        match self {
            Self::Num(n) => format_number(*n),
            Self::Str(s) => format!("\"{s}\""),
        }
    }
}

/// ToNumber subset: trimmed input, empty string is zero, signed `Infinity`,
/// unsigned hex literals, decimal literals with optional exponent; anything
/// else is NaN.
pub(crate) fn js_to_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return match u128::from_str_radix(hex, 16) {
            Ok(parsed) => parsed as f64,
            Err(_) => f64::NAN,
        };
    }
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if is_unsigned_decimal_literal(unsigned) {
        return unsigned.parse::<f64>().map_or(f64::NAN, |n| sign * n);
    }
    f64::NAN
}

/// Decimal literal shape: `digits[.digits]`, `.digits`, optional exponent.
/// Excludes Rust-only spellings such as `inf`, `nan`, or `1_0`.
fn is_unsigned_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut idx = 0;
    let mut integer_digits = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        integer_digits += 1;
        idx += 1;
    }
    let mut fraction_digits = 0;
    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            fraction_digits += 1;
            idx += 1;
        }
    }
    if integer_digits == 0 && fraction_digits == 0 {
        return false;
    }
    if idx < bytes.len() && (bytes[idx] == b'e' || bytes[idx] == b'E') {
        idx += 1;
        if idx < bytes.len() && (bytes[idx] == b'+' || bytes[idx] == b'-') {
            idx += 1;
        }
        let mut exponent_digits = 0;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            exponent_digits += 1;
            idx += 1;
        }
        if exponent_digits == 0 {
            return false;
        }
    }
    idx == bytes.len()
}

/// JS-style number stringification: `NaN`, signed `Infinity`, `-0` as `0`,
/// integral values without a decimal point.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    format_float(value)
}

fn format_float(value: f64) -> String {
    let mut out = format!("{value:.16}");
    while out.contains('.') && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

/// Literal values accepted by the mutable-state demo's inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Array(Vec<Literal>),
}

impl Literal {
    pub fn parse(src: &str) -> Result<Literal> {
        let mut cursor = Cursor::new(src);
        cursor.skip_ws();
        let value = cursor.parse_value()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(cursor.error("trailing characters after literal"));
        }
        Ok(value)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => f.write_str(&format_number(*n)),
            Self::Str(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        _ => std::fmt::Write::write_char(f, ch)?,
                    }
                }
                f.write_str("\"")
            }
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Null => f.write_str("null"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            bytes: src.as_bytes(),
            src,
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::Validation(format!("invalid literal at offset {}: {msg}", self.pos))
    }

    fn parse_value(&mut self) -> Result<Literal> {
        match self.peek() {
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string(b'"'),
            Some(b'\'') => self.parse_string(b'\''),
            Some(b't') | Some(b'f') | Some(b'n') => self.parse_keyword(),
            Some(b) if b.is_ascii_digit() || b == b'-' || b == b'+' || b == b'.' => {
                self.parse_number()
            }
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_array(&mut self) -> Result<Literal> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(Literal::Array(items));
            }
            if !items.is_empty() {
                if self.peek() != Some(b',') {
                    return Err(self.error("expected ',' or ']' in array"));
                }
                self.pos += 1;
                self.skip_ws();
            }
            items.push(self.parse_value()?);
        }
    }

    fn parse_string(&mut self, quote: u8) -> Result<Literal> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(Literal::Str(out));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'n') => out.push('\n'),
                        Some(b't') => out.push('\t'),
                        Some(b) if b == quote || b == b'\\' => out.push(b as char),
                        _ => return Err(self.error("unsupported escape in string")),
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    let ch = self.src[self.pos..]
                        .chars()
                        .next()
                        .ok_or_else(|| self.error("unterminated string"))?;
                    out.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn parse_keyword(&mut self) -> Result<Literal> {
        for (keyword, value) in [
            ("true", Literal::Bool(true)),
            ("false", Literal::Bool(false)),
            ("null", Literal::Null),
        ] {
            if self.src[self.pos..].starts_with(keyword) {
                self.pos += keyword.len();
                return Ok(value);
            }
        }
        Err(self.error("expected true, false, or null"))
    }

    fn parse_number(&mut self) -> Result<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.src[start..self.pos];
        let number = js_to_number(text);
        if number.is_nan() {
            return Err(self.error("malformed number"));
        }
        Ok(Literal::Num(number))
    }
}
