//! Shared rendering utilities.

/// Escapes text for use in HTML content and single- or double-quoted attributes.
///
/// ```
/// use portalsearch::ui::helpers::html_escape;
///
/// assert_eq!(html_escape("<b>'a' & \"b\"</b>"), "&lt;b&gt;&#39;a&#39; &amp; &quot;b&quot;&lt;/b&gt;");
/// ```
#[must_use]
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Returns at most `max` characters of `text`.
///
/// Operates on characters, not bytes, so multi-byte text is never split.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
