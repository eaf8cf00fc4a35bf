//! Material suggestions for partially typed queries.

use crate::store::Store;
use matprice_search::{calculate_relevance, closest, Ranked};
use serde::Serialize;
use std::collections::BTreeSet;

/// Edit distance allowed for "did you mean" hints.
const MAX_HINT_DISTANCE: usize = 2;

/// A distinct material, identified by name and specification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Material {
    pub name: String,
    pub specification: String,
}

/// Ranked matches plus fallback hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suggestions {
    pub matches: Vec<Ranked<Material>>,
    /// Nearby material names, filled only when nothing matched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub did_you_mean: Vec<String>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.did_you_mean.is_empty()
    }
}

impl Store {
    /// Distinct materials whose name or specification matches `query`, best first.
    pub fn suggest(&self, query: &str, limit: usize) -> Suggestions {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Suggestions::default();
        }

        let materials: BTreeSet<(&str, &str)> = self
            .records()
            .iter()
            .map(|r| (r.material_name(), r.specification()))
            .collect();

        let mut matches: Vec<Ranked<Material>> = materials
            .iter()
            .filter_map(|&(name, spec)| {
                let score = calculate_relevance(name, query).max(calculate_relevance(spec, query));
                (score > 0).then(|| {
                    Ranked::new(
                        Material {
                            name: name.to_string(),
                            specification: spec.to_string(),
                        },
                        score,
                    )
                })
            })
            .collect();

        // BTreeSet order already sorts by name then spec; the stable sort keeps it for ties.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(limit);

        let did_you_mean = if matches.is_empty() {
            let names: BTreeSet<&str> = materials.iter().map(|&(name, _)| name).collect();
            closest(query, names, MAX_HINT_DISTANCE)
                .into_iter()
                .take(limit)
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(query, matches = matches.len(), hints = did_you_mean.len(), "Suggestions computed");
        Suggestions { matches, did_you_mean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::source::{Cell, Row};
    use matprice_search::RelevanceScore;

    fn row(name: &str, spec: &str) -> Row {
        vec!["202301".into(), Cell::Empty, name.into(), spec.into(), "吨".into(), Cell::Empty, 1.0.into()]
    }

    fn store() -> Store {
        let mut store = Store::open(MemoryBackend::new());
        store
            .import_rows(vec![
                row("钢筋", "HRB400 φ16"),
                row("钢筋", "HRB400 φ12"),
                row("螺纹钢筋", "HRB335"),
                row("水泥", "P.O 42.5"),
                row("cement", "P.O 42.5"),
            ])
            .unwrap();
        store
    }

    fn names(s: &Suggestions) -> Vec<(&str, &str)> {
        s.matches
            .iter()
            .map(|m| (m.item.name.as_str(), m.item.specification.as_str()))
            .collect()
    }

    #[test]
    fn test_exact_before_contains() {
        let s = store().suggest("钢筋", 10);
        assert_eq!(
            names(&s),
            [("钢筋", "HRB400 φ12"), ("钢筋", "HRB400 φ16"), ("螺纹钢筋", "HRB335")]
        );
        assert_eq!(s.matches[0].score, RelevanceScore::Exact as u32);
        assert_eq!(s.matches[2].score, RelevanceScore::Contains as u32);
    }

    #[test]
    fn test_matches_on_specification() {
        let s = store().suggest("p.o", 10);
        assert_eq!(names(&s), [("cement", "P.O 42.5"), ("水泥", "P.O 42.5")]);
    }

    #[test]
    fn test_limit() {
        assert_eq!(store().suggest("钢筋", 1).matches.len(), 1);
        assert!(store().suggest("钢筋", 0).is_empty());
    }

    #[test]
    fn test_did_you_mean() {
        let s = store().suggest("cemnet", 10);
        assert!(s.matches.is_empty());
        assert_eq!(s.did_you_mean, ["cement"]);
    }

    #[test]
    fn test_nothing_close() {
        assert!(store().suggest("plywood", 10).is_empty());
    }
}
