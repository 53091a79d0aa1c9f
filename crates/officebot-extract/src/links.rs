//! Wiki link scanning
//!
//! Finds `[[target]]` and `[[target|display]]` links in infobox values.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[(?P<link>[^\]|\[<>{}]*)(?:\|(?P<text>.*?))?\]\]").expect("valid link regex")
});

/// One embedded wiki link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// Link target, trimmed
    pub target: String,
    /// Display text, trimmed; `None` when absent or blank
    pub text: Option<String>,
    /// Byte offset of the opening brackets
    pub start: usize,
}

impl WikiLink {
    /// Display text, falling back to the target
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.target)
    }
}

/// All links of `value`, in order of appearance
#[must_use]
pub fn find_links(value: &str) -> Vec<WikiLink> {
    LINK_REGEX
        .captures_iter(value)
        .map(|caps| {
            let whole = caps.get(0).map_or(0, |m| m.start());
            let target = caps.name("link").map_or("", |m| m.as_str()).trim();
            let text = caps
                .name("text")
                .map(|m| m.as_str().trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            WikiLink {
                target: target.to_string(),
                text,
                start: whole,
            }
        })
        .collect()
}

/// Remove link brackets, keeping the raw inner text
#[must_use]
pub fn strip_brackets(value: &str) -> String {
    value.replace("[[", "").replace("]]", "")
}
