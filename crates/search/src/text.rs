//! Case folding and substring filters.

/// Fold text for case-insensitive comparison.
///
/// Uses full Unicode lowercasing, so Latin grade names such as `HRB400`
/// match `hrb400` while CJK text passes through unchanged.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring test.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Optional filter: an empty (or whitespace-only) filter matches everything.
pub fn matches_filter(value: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || contains_folded(value, filter)
}
