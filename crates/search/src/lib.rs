//! Text matching for material price queries.
//!
//! This crate provides:
//! - Unicode-aware case folding and substring filters
//! - Multi-level relevance scoring
//! - Levenshtein edit distance for "did you mean" hints

mod fuzzy;
mod relevance;
mod text;

pub use fuzzy::{closest, is_subsequence, levenshtein_distance};
pub use relevance::{calculate_relevance, RelevanceScore};
pub use text::{contains_folded, fold, matches_filter};

/// An item paired with its relevance score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ranked<T> {
    /// The matched item
    pub item: T,
    /// Relevance score (higher is better)
    pub score: u32,
}

impl<T> Ranked<T> {
    /// Pair an item with its score.
    pub fn new(item: T, score: u32) -> Self {
        Self { item, score }
    }
}
