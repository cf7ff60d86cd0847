//! Centralized validation and helper functions.

/// Maximum number of data rows allowed in a single input file
pub const MAX_ROWS: usize = 100_000;

/// Minimum similarity for an identifier to be offered as a suggestion
pub const SUGGESTION_CUTOFF: f64 = 0.5;

/// Check if adding another row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_row_limit(count: usize) -> Option<String> {
    if count >= MAX_ROWS {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {MAX_ROWS}"
        ))
    } else {
        None
    }
}

/// Levenshtein distance over Unicode scalar values
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Case-insensitive similarity in `[0, 1]`, 1 meaning identical
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)] // Identifier lengths are small
    {
        1.0 - edit_distance(&a, &b) as f64 / longest as f64
    }
}

/// Find the candidate most similar to `value`, if any reaches [`SUGGESTION_CUTOFF`].
///
/// Ties are broken by the lexicographically smallest candidate so suggestions
/// are stable regardless of iteration order.
///
/// # Examples
///
/// ```
/// use mentor_match::utils::validation::closest_match;
///
/// let mentors = ["Alice", "Bob", "Carol"];
/// assert_eq!(closest_match("alcie", mentors), Some("Alice"));
/// assert_eq!(closest_match("Zzzzzz", mentors), None);
/// ```
#[must_use]
pub fn closest_match<'a>(value: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (similarity(value, c), c))
        .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
        .max_by(|(sa, ca), (sb, cb)| sa.total_cmp(sb).then_with(|| cb.cmp(ca)))
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_row_limit() {
        assert!(check_row_limit(100).is_none());
        assert!(check_row_limit(MAX_ROWS - 1).is_none());
        assert!(check_row_limit(MAX_ROWS).is_some());
        assert!(check_row_limit(MAX_ROWS + 1).is_some());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn test_similarity_ignores_case() {
        assert!((similarity("M1", "m1") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("M1", "Zed") < SUGGESTION_CUTOFF);
    }

    #[test]
    fn test_closest_match_is_order_independent() {
        assert_eq!(closest_match("M3", ["M1", "M2"]), Some("M1"));
        assert_eq!(closest_match("M3", ["M2", "M1"]), Some("M1"));
        assert_eq!(closest_match("anything", std::iter::empty()), None);
    }
}
