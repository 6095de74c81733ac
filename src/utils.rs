//! Utility functions for string truncation and HTML cleanup.

use scraper::Html;

/// Truncate a string to at most `max` bytes, never splitting a UTF-8
/// character.
///
/// Used to bound the amount of article text sent to the model. Feed content
/// regularly contains multibyte characters, so a plain byte slice would
/// panic mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("héllo", 2), "h");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", truncate_chars(s, max), s.len() - max)
    }
}

/// Strip HTML markup from a fragment, collapsing whitespace.
///
/// Feed summaries frequently arrive as HTML. The summarizer and the fetch
/// fallback want plain text, so tags are dropped and runs of whitespace are
/// squeezed to single spaces.
pub fn html_to_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    let text = doc.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
