//! Article entries and their persisted reading position

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an entry in the durable store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        EntryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One article as supplied by the entry store.
///
/// `screen_position` is a raw scroll offset in device pixels. It is never a
/// normalized progress value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    /// Link to the original article, if known
    #[serde(default)]
    pub url: Option<String>,
    /// Raw HTML body
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub screen_position: f32,
}

impl Entry {
    pub fn new(id: EntryId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: None,
            content: None,
            screen_position: 0.0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_screen_position(mut self, position: f32) -> Self {
        self.screen_position = position;
        self
    }

    /// Offset to restore in the web view. Negative or non-finite stored
    /// values read as 0.
    pub fn screen_position_for_webview(&self) -> f64 {
        let p = f64::from(self.screen_position);
        if p.is_finite() && p > 0.0 {
            p
        } else {
            0.0
        }
    }

    /// Heading markup placed above the body. The title is escaped and linked
    /// to the original article when a URL is known.
    pub fn title_html(&self) -> String {
        let title = escape_html(&self.title);
        match self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => format!(
                "<h1 class=\"entry-title\"><a href=\"{}\">{}</a></h1>",
                escape_html(url),
                title
            ),
            None => format!("<h1 class=\"entry-title\">{}</h1>", title),
        }
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
