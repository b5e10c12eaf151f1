//! HTML escaping and URL guarding.

/// Escape HTML metacharacters (`&`, `<`, `>`, `"`, `'`).
///
/// Not idempotent: an existing entity is escaped again, so `&amp;` becomes
/// `&amp;amp;`. The renderer calls this exactly once per line of input.
///
/// # Examples
///
/// ```
/// use tidbit::markdown::escape_html;
///
/// assert_eq!(escape_html("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Return `url` if its scheme is `http` or `https`, otherwise `"#"`.
///
/// The check is case-insensitive and ignores surrounding whitespace.
/// Relative URLs have no scheme and also degrade to `"#"`.
///
/// ```
/// use tidbit::markdown::safe_url;
///
/// assert_eq!(safe_url("https://example.com"), "https://example.com");
/// assert_eq!(safe_url("javascript:alert(1)"), "#");
/// ```
pub fn safe_url(url: &str) -> &str {
    let trimmed = url.trim();
    if has_prefix_ignore_case(trimmed, "http://") || has_prefix_ignore_case(trimmed, "https://") {
        trimmed
    } else {
        tracing::trace!(url, "rejected url scheme");
        "#"
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
