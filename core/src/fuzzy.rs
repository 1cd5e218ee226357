//! Edit-distance suggestions for mistyped command names and flags.
//!
//! # Examples
//!
//! ```
//! use cmdplan_core::{levenshtein, suggest_flag};
//!
//! assert_eq!(levenshtein("biuld", "build"), 2);
//!
//! let suggestion = suggest_flag("--relase", ["--release", "--replace"], 2);
//! assert_eq!(suggestion.nearest.as_deref(), Some("--release"));
//! assert_eq!(suggestion.alternatives, ["--release", "--replace"]);
//! ```

use std::collections::HashSet;

/// Default distance under which aliases count as close alternatives.
pub const DEFAULT_SUGGESTION_THRESHOLD: usize = 2;

/// Levenshtein edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Lowest-distance candidate; the first candidate wins ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<T> {
    /// The winning candidate.
    pub candidate: T,
    /// Its edit distance to the target.
    pub distance: usize,
}

/// Finds the candidate closest to `target`, keyed by `name`.
///
/// Ties resolve to the earliest candidate, so iteration order decides.
pub fn closest<T, I, F>(target: &str, candidates: I, name: F) -> Option<Match<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    let mut best: Option<Match<T>> = None;
    for candidate in candidates {
        let distance = levenshtein(target, name(&candidate));
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(Match {
                candidate,
                distance,
            });
        }
    }
    best
}

/// Suggestions for an unrecognized flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSuggestion {
    /// The single closest alias; `None` when several tie for closest or
    /// there are no candidates.
    pub nearest: Option<String>,
    /// Every alias within the threshold distance, in candidate order.
    pub alternatives: Vec<String>,
}

/// Builds suggestions for the unknown flag `flag` from known aliases.
pub fn suggest_flag<I, S>(flag: &str, aliases: I, threshold: usize) -> FlagSuggestion
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<(usize, String)> = None;
    let mut tied = false;
    let mut alternatives = Vec::new();
    let mut seen = HashSet::new();

    for alias in aliases {
        let alias = alias.as_ref();
        // Separate records may declare the same alias; count it once.
        if !seen.insert(alias.to_string()) {
            continue;
        }
        let distance = levenshtein(flag, alias);
        let lowest = best.as_ref().map(|(lowest, _)| *lowest);
        match lowest {
            Some(lowest) if distance > lowest => {}
            Some(lowest) if distance == lowest => tied = true,
            _ => {
                best = Some((distance, alias.to_string()));
                tied = false;
            }
        }
        if distance <= threshold {
            alternatives.push(alias.to_string());
        }
    }

    FlagSuggestion {
        nearest: best.filter(|_| !tied).map(|(_, alias)| alias),
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("build", "build"), 0);
        assert_eq!(levenshtein("--relase", "--release"), 1);
        assert_eq!(levenshtein("--relase", "--replace"), 2);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("größe", "grosse"), 3);
    }

    #[test]
    fn test_closest_prefers_lowest_distance() {
        let found = closest("biuld", ["bundle", "build", "test"], |n| *n).unwrap();
        assert_eq!(found.candidate, "build");
        assert_eq!(found.distance, 2);
        assert!(levenshtein("biuld", "bundle") > found.distance);
    }

    #[test]
    fn test_closest_transposition_ties_resolve_by_order() {
        // A swap costs two edits, so "bundle" ties with "build" here.
        assert_eq!(levenshtein("buidl", "bundle"), 2);
        let found = closest("buidl", ["build", "bundle", "test"], |n| *n).unwrap();
        assert_eq!(found.candidate, "build");
    }

    #[test]
    fn test_closest_tie_goes_to_first() {
        let found = closest("ab", ["ax", "ay"], |n| *n).unwrap();
        assert_eq!(found.candidate, "ax");
    }

    #[test]
    fn test_closest_empty() {
        assert!(closest("x", Vec::<&str>::new(), |n| *n).is_none());
    }

    #[test]
    fn test_suggest_flag_tie_has_no_nearest() {
        let suggestion = suggest_flag("--ab", ["--ax", "--ay"], DEFAULT_SUGGESTION_THRESHOLD);
        assert_eq!(suggestion.nearest, None);
        assert_eq!(suggestion.alternatives, ["--ax", "--ay"]);
    }

    #[test]
    fn test_suggest_flag_repeated_alias_is_not_a_tie() {
        let suggestion = suggest_flag(
            "--verbos",
            ["--verbose", "--quiet", "--verbose"],
            DEFAULT_SUGGESTION_THRESHOLD,
        );
        assert_eq!(suggestion.nearest.as_deref(), Some("--verbose"));
        assert_eq!(suggestion.alternatives, ["--verbose"]);
    }

    #[test]
    fn test_suggest_flag_far_candidates_are_not_alternatives() {
        let suggestion = suggest_flag("--zzzzzz", ["--verbose"], DEFAULT_SUGGESTION_THRESHOLD);
        assert_eq!(suggestion.nearest.as_deref(), Some("--verbose"));
        assert!(suggestion.alternatives.is_empty());
    }
}
