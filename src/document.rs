//! Document builder: turns an entry into the HTML payload loaded by the surface.
//!
//! Building is a pure function of the entry and the justify flag. A missing
//! body degrades to an empty one.

use crate::Entry;
use scraper::{Html, Selector};

const BASE_STYLE: &str = "body{margin:0 16px;word-wrap:break-word;}img,video,iframe{max-width:100%;height:auto;}pre{white-space:pre-wrap;}";
const JUSTIFY_STYLE: &str = "body{text-align:justify;-webkit-hyphens:auto;hyphens:auto;}";

/// Title markup followed by the body content (empty when absent).
pub fn entry_markup(entry: &Entry) -> String {
    let mut out = entry.title_html();
    out.push_str(entry.content.as_deref().unwrap_or(""));
    out
}

/// Full HTML document for `entry`.
pub fn build_document(entry: &Entry, justify: bool) -> String {
    wrap_content(&entry_markup(entry), justify)
}

/// Wrap a content fragment in the reader's HTML shell.
pub fn wrap_content(content: &str, justify: bool) -> String {
    let mut style = String::from(BASE_STYLE);
    if justify {
        style.push_str(JUSTIFY_STYLE);
    }
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<style>{}</style></head><body>{}</body></html>",
        style, content
    )
}

/// A textual view of a built document, for previews and tests
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Text of the first `<h1>`
    pub heading: String,
    /// Text of the body, title included
    pub text: String,
    /// Whether the justify stylesheet is present
    pub justified: bool,
}

impl DocumentSnapshot {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let h1_sel = Selector::parse("h1").unwrap();
        let body_sel = Selector::parse("body").unwrap();
        let style_sel = Selector::parse("style").unwrap();

        let heading = document
            .select(&h1_sel)
            .next()
            .map(|n| n.text().collect::<String>())
            .unwrap_or_default();

        let text = document
            .select(&body_sel)
            .next()
            .map(|b| b.text().collect::<String>())
            .unwrap_or_default();

        let justified = document
            .select(&style_sel)
            .any(|s| s.text().collect::<String>().contains("text-align:justify"));

        Self {
            heading,
            text,
            justified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryId;

    #[test]
    fn markup_is_title_then_body() {
        let e = Entry::new(EntryId::new("1"), "Hello").with_content("<p>World</p>");
        assert_eq!(
            entry_markup(&e),
            "<h1 class=\"entry-title\">Hello</h1><p>World</p>"
        );
    }

    #[test]
    fn missing_content_yields_empty_body() {
        let e = Entry::new(EntryId::new("1"), "Only title");
        assert_eq!(entry_markup(&e), e.title_html());
        let snap = DocumentSnapshot::parse(&build_document(&e, false));
        assert_eq!(snap.heading, "Only title");
        assert_eq!(snap.text, "Only title");
    }

    #[test]
    fn justify_flag_controls_stylesheet() {
        let e = Entry::new(EntryId::new("1"), "T").with_content("<p>x</p>");
        assert!(DocumentSnapshot::parse(&build_document(&e, true)).justified);
        assert!(!DocumentSnapshot::parse(&build_document(&e, false)).justified);
    }

    #[test]
    fn build_is_pure() {
        let e = Entry::new(EntryId::new("1"), "T").with_content("<p>x</p>");
        assert_eq!(build_document(&e, true), build_document(&e, true));
    }
}
