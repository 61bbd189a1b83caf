//! Text match scoring.

/// Score a record's name and description against a case-folded query.
///
/// Returns 0 for an empty query or a record with no textual relation to
/// it; any match yields a positive score. Name-level, name-word and
/// description bonuses are additive.
pub fn match_score(query: &str, name: &str, desc: Option<&str>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let name_lower = name.to_lowercase();
    let desc_lower = desc.map(str::to_lowercase).unwrap_or_default();
    let query_len = query.len() as f64;
    let mut score = 0.0;

    // Exact match on name - highest priority
    if name_lower == query {
        score += 1000.0;
    }
    // Name starts with query
    else if name_lower.starts_with(query) {
        score += 500.0 + (query_len / name_lower.len() as f64) * 100.0;
    }
    // Name contains query
    else if name_lower.contains(query) {
        score += 200.0 + (query_len / name_lower.len() as f64) * 50.0;
    }

    // Word boundary match in name (e.g., "react" matches "create-react-app")
    let name_words: Vec<&str> = name_lower.split(['-', '_', '.', '/']).collect();
    if name_words.iter().any(|word| *word == query) {
        score += 300.0;
    } else if name_words.iter().any(|word| word.starts_with(query)) {
        score += 150.0;
    }

    // Description contains query
    if !desc_lower.is_empty() && desc_lower.contains(query) {
        score += 50.0 + (query_len / desc_lower.len().max(1) as f64) * 20.0;

        if desc_lower.split_whitespace().any(|word| word == query) {
            score += 30.0;
        } else if desc_lower
            .split_whitespace()
            .any(|word| word.starts_with(query))
        {
            score += 15.0;
        }
    }

    score
}
