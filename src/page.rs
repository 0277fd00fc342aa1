//! In-memory rendering target. A [`Page`] stores elements keyed by
//! identifier; demos resolve the identifiers they need into [`Handle`]s up
//! front and perform every later mutation through those handles. Content is
//! stored as already-escaped HTML produced by [`Markup`].

use std::collections::HashMap;

use crate::markup::{Markup, escape_html_text};
use crate::{Error, Result};

/// Validated element reference. Holding one proves the element existed when
/// the owning unit was constructed; it does not pin the element, so writes
/// through a stale handle are dropped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    id: String,
}

impl Handle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag_name: String,
    attrs: HashMap<String, String>,
    classes: Vec<String>,
    value: String,
    disabled: bool,
    html: String,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: HashMap::new(),
            classes: Vec::new(),
            value: String::new(),
            disabled: false,
            html: String::new(),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.html = escape_html_text(text);
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct Page {
    elements: HashMap<String, Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, element: Element) -> &mut Self {
        self.elements.insert(id.to_string(), element);
        self
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.elements.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Element Resolver: the only way to obtain a [`Handle`].
    pub fn resolve(&self, id: &str) -> Result<Handle> {
        if self.elements.contains_key(id) {
            Ok(Handle { id: id.to_string() })
        } else {
            Err(Error::MissingElement(id.to_string()))
        }
    }

    pub fn set_html(&mut self, handle: &Handle, markup: &Markup) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.html = markup.as_str().to_string();
        }
    }

    pub fn set_text(&mut self, handle: &Handle, text: &str) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.html = escape_html_text(text);
        }
    }

    pub fn append_text(&mut self, handle: &Handle, text: &str) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.html.push_str(&escape_html_text(text));
        }
    }

    pub fn set_attr(&mut self, handle: &Handle, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn toggle_class(&mut self, handle: &Handle, class: &str, on: bool) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            let present = element.classes.iter().position(|c| c == class);
            match (present, on) {
                (None, true) => element.classes.push(class.to_string()),
                (Some(idx), false) => {
                    element.classes.remove(idx);
                }
                _ => {}
            }
        }
    }

    pub fn set_disabled(&mut self, handle: &Handle, disabled: bool) {
        if let Some(element) = self.elements.get_mut(&handle.id) {
            element.disabled = disabled;
        }
    }

    /// User-typing surface, addressed by id like the read-back accessors.
    pub fn set_value(&mut self, id: &str, value: &str) -> Result<()> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| Error::MissingElement(id.to_string()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub fn value_of(&self, id: &str) -> Result<String> {
        self.get(id).map(|element| element.value.clone())
    }

    pub fn html_of(&self, id: &str) -> Result<String> {
        self.get(id).map(|element| element.html.clone())
    }

    /// Inner text: content with tags stripped and entities decoded.
    pub fn text_of(&self, id: &str) -> Result<String> {
        let html = self.html_of(id)?;
        let mut out = String::with_capacity(html.len());
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        Ok(out
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&"))
    }

    pub fn attr(&self, id: &str, name: &str) -> Result<Option<String>> {
        self.get(id).map(|element| element.attrs.get(name).cloned())
    }

    pub fn has_class(&self, id: &str, class: &str) -> Result<bool> {
        self.get(id)
            .map(|element| element.classes.iter().any(|c| c == class))
    }

    pub fn is_disabled(&self, id: &str) -> Result<bool> {
        self.get(id).map(|element| element.disabled)
    }

    pub fn tag_of(&self, id: &str) -> Result<String> {
        self.get(id).map(|element| element.tag_name.clone())
    }

    fn get(&self, id: &str) -> Result<&Element> {
        self.elements
            .get(id)
            .ok_or_else(|| Error::MissingElement(id.to_string()))
    }

    /// Standard markup covering all seven demos and the progress indicator.
    pub fn demo_fixture() -> Page {
        let mut page = Page::new();
        page.insert(
            "progress-bar",
            Element::new("div")
                .with_attr("role", "progressbar")
                .with_attr("aria-valuenow", "0"),
        );
        for section in [
            "comparison-coercion",
            "arithmetic-coercion",
            "mutable-state",
            "async-recovery",
            "this-binding",
            "scope-pollution",
            "callback-timing",
        ] {
            page.insert(section, Element::new("section"));
        }

        page.insert("comparison-value1", Element::new("input"));
        page.insert("comparison-value2", Element::new("input"));
        page.insert(
            "comparison-run",
            Element::new("button").with_text("Compare Values"),
        );
        page.insert("comparison-result", Element::new("div"));

        page.insert("arithmetic-form", Element::new("form"));
        page.insert("arithmetic-value1", Element::new("input"));
        page.insert("arithmetic-value2", Element::new("input"));
        page.insert(
            "arithmetic-operator",
            Element::new("select").with_value("+"),
        );
        page.insert(
            "arithmetic-run",
            Element::new("button").with_text("Calculate"),
        );
        page.insert("arithmetic-result", Element::new("div"));

        page.insert("mutable-array", Element::new("input"));
        page.insert("mutable-item", Element::new("input"));
        page.insert(
            "mutable-run",
            Element::new("button").with_text("Mutate Array"),
        );
        page.insert("mutable-result", Element::new("div"));

        page.insert(
            "async-run",
            Element::new("button").with_text("Trigger Async Operation"),
        );
        page.insert("async-result", Element::new("p").with_class("d-none"));
        page.insert("async-failure", Element::new("div").with_class("d-none"));

        page.insert("this-run", Element::new("button").with_text("Run Demo"));
        page.insert("this-result", Element::new("div"));

        page.insert("scope-run", Element::new("button").with_text("Run Demo"));
        page.insert("scope-result", Element::new("div"));

        page.insert("timing-run", Element::new("button").with_text("Run Tasks"));
        page.insert("timing-result", Element::new("div"));

        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reports_missing_elements() {
        let page = Page::new();
        assert_eq!(
            page.resolve("nope"),
            Err(Error::MissingElement("nope".to_string()))
        );
    }

    #[test]
    fn mutations_through_stale_handles_are_dropped() -> Result<()> {
        let mut page = Page::new();
        page.insert("target", Element::new("div"));
        let handle = page.resolve("target")?;
        assert!(page.remove("target"));
        page.set_text(&handle, "late write");
        page.set_disabled(&handle, true);
        assert!(!page.contains("target"));
        Ok(())
    }

    #[test]
    fn toggle_class_is_idempotent_per_direction() -> Result<()> {
        let mut page = Page::new();
        page.insert("box", Element::new("div"));
        let handle = page.resolve("box")?;
        page.toggle_class(&handle, "d-none", true);
        page.toggle_class(&handle, "d-none", true);
        assert!(page.has_class("box", "d-none")?);
        page.toggle_class(&handle, "d-none", false);
        page.toggle_class(&handle, "d-none", false);
        assert!(!page.has_class("box", "d-none")?);
        Ok(())
    }

    #[test]
    fn text_of_strips_tags_and_decodes_entities() -> Result<()> {
        let mut page = Page::new();
        page.insert("out", Element::new("div"));
        let handle = page.resolve("out")?;
        let mut markup = Markup::new();
        markup.open("p").text("a < b & c").close("p");
        page.set_html(&handle, &markup);
        assert_eq!(page.text_of("out")?, "a < b & c");
        Ok(())
    }

    #[test]
    fn fixture_contains_every_demo_anchor() {
        let page = Page::demo_fixture();
        for id in [
            "progress-bar",
            "comparison-run",
            "arithmetic-operator",
            "mutable-result",
            "async-failure",
            "this-result",
            "scope-run",
            "timing-result",
        ] {
            assert!(page.contains(id), "fixture is missing {id}");
        }
    }
}
