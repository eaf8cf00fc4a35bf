//! Relevance scoring for material suggestions.

use crate::{fold, is_subsequence};

/// Relevance score levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelevanceScore {
    /// No match
    None = 0,
    /// Characters appear in order
    Subsequence = 10,
    /// Contains substring
    Contains = 20,
    /// A whitespace-separated word starts with the query
    WordBoundary = 30,
    /// Starts with query
    StartsWith = 40,
    /// Exact match
    Exact = 50,
}

/// Calculate relevance score for a text against a query.
///
/// Returns 0 for an empty query.
pub fn calculate_relevance(text: &str, query: &str) -> u32 {
    let text = fold(text);
    let query = fold(query.trim());

    let level = if query.is_empty() {
        RelevanceScore::None
    } else if text == query {
        RelevanceScore::Exact
    } else if text.starts_with(&query) {
        RelevanceScore::StartsWith
    } else if text.split_whitespace().any(|word| word.starts_with(&query)) {
        RelevanceScore::WordBoundary
    } else if text.contains(&query) {
        RelevanceScore::Contains
    } else if is_subsequence(&text, &query) {
        RelevanceScore::Subsequence
    } else {
        RelevanceScore::None
    };

    level as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(calculate_relevance("水泥", "水泥"), RelevanceScore::Exact as u32);
    }

    #[test]
    fn test_starts_with() {
        assert_eq!(calculate_relevance("钢筋笼", "钢筋"), RelevanceScore::StartsWith as u32);
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(
            calculate_relevance("HRB400 Φ16", "φ16"),
            RelevanceScore::WordBoundary as u32
        );
    }

    #[test]
    fn test_contains() {
        assert_eq!(calculate_relevance("螺纹钢筋", "钢筋"), RelevanceScore::Contains as u32);
    }

    #[test]
    fn test_subsequence() {
        assert_eq!(calculate_relevance("螺纹钢筋", "螺筋"), RelevanceScore::Subsequence as u32);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        assert_eq!(calculate_relevance("水泥", "  "), 0);
    }
}
