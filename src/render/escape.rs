//! Escaping of characters with special meaning in HTML.

/// Escape `&`, `<` and `>` in text content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}
