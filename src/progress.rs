//! Progress tracker: consumes section-visibility notifications and keeps the
//! shared indicator at the highest section visited so far.

use crate::Result;
use crate::page::{Handle, Page};
use crate::value::format_number;

pub const INDICATOR_ID: &str = "progress-bar";

const VISIBILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug)]
pub struct ProgressTracker {
    sections: Vec<String>,
    bar: Option<Handle>,
    highest: Option<usize>,
}

impl ProgressTracker {
    pub fn new(page: &Page, sections: &[&str]) -> Result<Self> {
        Ok(Self {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            bar: Some(page.resolve(INDICATOR_ID)?),
            highest: None,
        })
    }

    /// Notification entry point. Ratios below the threshold, unknown
    /// sections, and sections at or behind the highest visited are ignored.
    pub fn section_visible(&mut self, page: &mut Page, section_id: &str, visible_ratio: f64) {
        let Some(bar) = self.bar.clone() else {
            return;
        };
        if visible_ratio < VISIBILITY_THRESHOLD {
            return;
        }
        let Some(position) = self.sections.iter().position(|s| s == section_id) else {
            return;
        };
        if self.highest.is_some_and(|highest| position <= highest) {
            return;
        }
        self.highest = Some(position);

        let total = self.sections.len();
        let percent = format_number((position + 1) as f64 * 100.0 / total as f64);
        page.set_attr(&bar, "style", &format!("width: {percent}%"));
        page.set_attr(&bar, "aria-valuenow", &percent);
        page.set_text(&bar, &format!("{}/{total}", position + 1));
    }

    pub fn current_section(&self) -> Option<usize> {
        self.highest
    }

    /// Stop accepting notifications and release the indicator.
    pub fn teardown(&mut self) {
        self.bar = None;
        self.sections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;

    fn page_with_bar() -> Page {
        let mut page = Page::new();
        page.insert(INDICATOR_ID, Element::new("div"));
        page
    }

    #[test]
    fn missing_indicator_aborts_construction() {
        let page = Page::new();
        assert!(ProgressTracker::new(&page, &["a"]).is_err());
    }

    #[test]
    fn accepted_notification_updates_width_value_and_label() -> Result<()> {
        let mut page = page_with_bar();
        let mut tracker = ProgressTracker::new(&page, &["intro", "middle", "end", "extra"])?;
        tracker.section_visible(&mut page, "middle", 0.75);
        assert_eq!(tracker.current_section(), Some(1));
        assert_eq!(page.attr(INDICATOR_ID, "style")?.as_deref(), Some("width: 50%"));
        assert_eq!(page.attr(INDICATOR_ID, "aria-valuenow")?.as_deref(), Some("50"));
        assert_eq!(page.text_of(INDICATOR_ID)?, "2/4");
        Ok(())
    }

    #[test]
    fn progress_never_moves_backwards() -> Result<()> {
        let mut page = page_with_bar();
        let mut tracker = ProgressTracker::new(&page, &["a", "b", "c"])?;
        tracker.section_visible(&mut page, "c", 0.9);
        tracker.section_visible(&mut page, "a", 0.9);
        assert_eq!(tracker.current_section(), Some(2));
        assert_eq!(page.text_of(INDICATOR_ID)?, "3/3");
        Ok(())
    }

    #[test]
    fn below_threshold_and_unknown_sections_are_ignored() -> Result<()> {
        let mut page = page_with_bar();
        let mut tracker = ProgressTracker::new(&page, &["a", "b"])?;
        tracker.section_visible(&mut page, "b", 0.49);
        tracker.section_visible(&mut page, "stranger", 1.0);
        assert_eq!(tracker.current_section(), None);
        assert_eq!(page.text_of(INDICATOR_ID)?, "");
        Ok(())
    }

    #[test]
    fn teardown_stops_notifications() -> Result<()> {
        let mut page = page_with_bar();
        let mut tracker = ProgressTracker::new(&page, &["a"])?;
        tracker.teardown();
        tracker.section_visible(&mut page, "a", 1.0);
        assert_eq!(page.text_of(INDICATOR_ID)?, "");
        tracker.teardown();
        Ok(())
    }
}
