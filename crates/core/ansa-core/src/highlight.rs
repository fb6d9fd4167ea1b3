//! Query highlighting for result questions

use regex::RegexBuilder;

/// Wrap query occurrences in `<mark>` tags, case-insensitively
///
/// The question text is HTML-escaped first so snapshot content cannot
/// carry markup into the page, and the query is regex-escaped so its
/// metacharacters match literally. The original casing of each matched
/// region is preserved.
pub fn highlight_matches(text: &str, query: &str) -> String {
    let escaped_text = escape_html(text);
    if query.is_empty() {
        return escaped_text;
    }

    let pattern = regex::escape(&escape_html(query));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace_all(&escaped_text, "<mark>$0</mark>").into_owned(),
        Err(_) => escaped_text,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
