//! Escaped HTML assembly. Every piece of dynamic text flows through
//! [`Markup::text`] or an attribute slot, so reflected input can never break
//! out of its element.

use std::fmt;

pub(crate) fn escape_html_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_html_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Incrementally built HTML fragment. Tag and attribute names come from the
/// caller verbatim; text and attribute values are escaped on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut markup = Self::new();
        markup.text(text);
        markup
    }

    /// `<code>` fragment around escaped text, the table cells' usual shape.
    pub fn code(text: &str) -> Self {
        let mut markup = Self::new();
        markup.elem("code", text);
        markup
    }

    pub fn open(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape_html_attr(value));
            self.buf.push('"');
        }
        self.buf.push('>');
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html_text(text));
        self
    }

    pub fn elem(&mut self, tag: &str, text: &str) -> &mut Self {
        self.open(tag).text(text).close(tag)
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.buf.push_str("<br>");
        self
    }

    pub fn append(&mut self, other: &Markup) -> &mut Self {
        self.buf.push_str(&other.buf);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

/// Bordered comparison table, the rendering shape shared by most demos.
#[derive(Debug, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<(Option<String>, Vec<Markup>)>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<Markup>) -> &mut Self {
        self.rows.push((None, cells));
        self
    }

    pub fn classed_row(&mut self, class: &str, cells: Vec<Markup>) -> &mut Self {
        self.rows.push((Some(class.to_string()), cells));
        self
    }

    pub fn render(&self) -> Markup {
        let mut out = Markup::new();
        out.open_with("table", &[("class", "table table-bordered")]);
        out.open("thead").open("tr");
        for head in &self.header {
            out.elem("th", head);
        }
        out.close("tr").close("thead");
        out.open("tbody");
        for (class, cells) in &self.rows {
            match class {
                Some(class) => out.open_with("tr", &[("class", class)]),
                None => out.open("tr"),
            };
            for cell in cells {
                out.open("td").append(cell).close("td");
            }
            out.close("tr");
        }
        out.close("tbody").close("table");
        out
    }
}
