//! Shared helpers for HTML output.

/// Escape the characters that would otherwise start markup.
///
/// Only `&`, `<` and `>` are touched, so quotes in prose survive and the
/// inline pipeline can still recognise quoted emphasis delimiters.
///
/// # Examples
///
/// ```
/// use orgflow_renderer::escape_html;
///
/// assert_eq!(escape_html("a & b < c"), "a &amp; b &lt; c");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a value for use inside a double-quoted attribute.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Whether `path` names an image by extension.
pub(crate) fn is_image_path(path: &str) -> bool {
    const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];

    path.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
    })
}

/// Push two spaces per level of `depth`.
pub(crate) fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
