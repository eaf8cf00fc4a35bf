//! Fuzzy matching algorithms.

/// Calculate Levenshtein edit distance between two strings.
///
/// Operates on `char`s, so one CJK character counts as one edit.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Check whether every character of `query` appears in `text` in order.
pub fn is_subsequence(text: &str, query: &str) -> bool {
    let mut text_chars = text.chars();
    query
        .chars()
        .all(|q| text_chars.by_ref().any(|c| c == q))
}

/// Candidates within `max_distance` edits of `query`, nearest first.
///
/// Comparison is case-insensitive; ties keep the candidates' input order.
pub fn closest<'a, I>(query: &str, candidates: I, max_distance: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = crate::fold(query);
    let mut scored: Vec<(usize, &'a str)> = candidates
        .into_iter()
        .map(|c| (levenshtein_distance(&crate::fold(c), &query), c))
        .filter(|(d, _)| *d <= max_distance)
        .collect();
    scored.sort_by_key(|(d, _)| *d);
    scored.into_iter().map(|(_, c)| c).collect()
}
