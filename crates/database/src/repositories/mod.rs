pub mod calendar;
pub mod comments;
pub mod projects;
pub mod tasks;

/// Wrap a free-text search term for ILIKE, matching `%`, `_` and `\` literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Trimmed search term, or `None` when blank.
pub(crate) fn search_term(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
