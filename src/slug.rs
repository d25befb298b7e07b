//! Title <-> URL slug conversion.
//!
//! The mapping is lossy: punctuation and case are dropped on the way in and
//! cannot be recovered on the way out. `decode` only produces a search query.

/// Lowercases the title and collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, trimming hyphens at both ends.
pub fn encode(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Turns a slug back into a search query by replacing hyphens with spaces.
pub fn decode(slug: &str) -> String {
    slug.replace('-', " ")
}
