/// Specificity scoring and ordering of route patterns
///
/// Higher score = more specific = registered (and therefore tried) first.
use std::cmp::{Ordering, Reverse};

use super::parser::{PatternSegment, RoutePattern};

/// Weight class of a literal component
pub const LITERAL_WEIGHT: u64 = 3;
/// Weight class of a `:param` component
pub const PARAM_WEIGHT: u64 = 2;
/// Weight class of a `*catch_all` component
pub const CATCH_ALL_WEIGHT: u64 = 1;

/// Components that contribute to the integer score.
///
/// Each position is a base-4 digit, most significant first, so comparing two
/// scores compares weight classes left to right. Positions past this depth
/// still order correctly through [`compare_specificity`].
pub const SCORED_DEPTH: usize = 31;

fn weight(segment: &PatternSegment) -> u64 {
    match segment {
        PatternSegment::Literal(_) => LITERAL_WEIGHT,
        PatternSegment::Param(_) => PARAM_WEIGHT,
        PatternSegment::CatchAll(_) => CATCH_ALL_WEIGHT,
    }
}

/// Calculates the specificity score of a pattern (pure function)
///
/// # Examples
///
/// ```
/// use routefs::route::parser::parse_pattern;
/// use routefs::route::priority::calculate_priority;
///
/// let score = |segments: &[&str]| {
///     let (_, parsed, _) = parse_pattern(segments.iter().copied()).unwrap();
///     calculate_priority(&parsed)
/// };
///
/// assert!(score(&["user", "create"]) > score(&["user", "[id]"]));
/// assert!(score(&["docs", "[id]"]) > score(&["docs", "[...slug]"]));
/// assert_eq!(score(&["index"]), 0);
/// ```
pub fn calculate_priority(segments: &[PatternSegment]) -> u64 {
    segments
        .iter()
        .take(SCORED_DEPTH)
        .enumerate()
        .map(|(i, seg)| weight(seg) << (2 * (SCORED_DEPTH - 1 - i)))
        .sum()
}

/// Compares two patterns by specificity, most specific first.
///
/// Components are compared left to right by weight class; when one pattern
/// is a prefix of the other, the longer one is more specific.
pub fn compare_specificity(a: &[PatternSegment], b: &[PatternSegment]) -> Ordering {
    let key = |segments: &[PatternSegment]| segments.iter().map(weight).collect::<Vec<_>>();
    Reverse(key(a)).cmp(&Reverse(key(b)))
}

/// Assigns every pattern its score and sorts by descending specificity.
///
/// The sort is stable: patterns of equal specificity keep their discovery
/// order, which includes exact duplicates of the same `url_pattern`.
pub fn rank(patterns: Vec<RoutePattern>) -> Vec<RoutePattern> {
    let mut ranked: Vec<RoutePattern> = patterns
        .into_iter()
        .map(|pattern| RoutePattern {
            priority: calculate_priority(&pattern.segments),
            ..pattern
        })
        .collect();

    ranked.sort_by(|a, b| compare_specificity(&a.segments, &b.segments));
    ranked
}
