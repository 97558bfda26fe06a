//! "Did you mean" hints for mistyped sprite names

/// Edit distance (insertions, deletions, substitutions) between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();

    // row[j] = distance between the prefix of `a` seen so far and b[..j]
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for j in 1..=b.len() {
            let above = row[j];
            let cost = usize::from(ca != b[j - 1]);
            row[j] = (above + 1).min(row[j - 1] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Up to three candidates within `max_distance` of `query`, closest first.
///
/// Comparison ignores case. Ties keep the candidates' original order.
pub fn suggest<'a>(query: &str, candidates: &[&'a str], max_distance: usize) -> Vec<&'a str> {
    let query = query.to_lowercase();
    let mut scored: Vec<(&str, usize)> = candidates
        .iter()
        .map(|&c| (c, levenshtein_distance(&query, &c.to_lowercase())))
        .filter(|(_, d)| *d <= max_distance)
        .collect();
    scored.sort_by_key(|(_, d)| *d);
    scored.into_iter().take(3).map(|(c, _)| c).collect()
}

/// Format a "did you mean?" hint. Returns `None` if there is nothing to suggest.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    match suggestions {
        [] => None,
        [one] => Some(format!("Did you mean '{}'?", one)),
        [first, second] => Some(format!("Did you mean '{}' or '{}'?", first, second)),
        [rest @ .., last] => {
            let quoted: Vec<String> = rest.iter().map(|s| format!("'{}'", s)).collect();
            Some(format!("Did you mean {}, or '{}'?", quoted.join(", "), last))
        }
    }
}
