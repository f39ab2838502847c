//! Suggestion ranking.
//!
//! Ranks suggestions so the least effort for the rider comes first.

use std::cmp::Ordering;

use crate::domain::Suggestion;

use super::SuggestOptions;

/// Rank suggestions by preference.
///
/// Suggestions are ranked by:
/// 1. Walking the whole way, when offered
/// 2. Total walking distance (shorter is better)
/// 3. Total distance travelled (shorter is better)
/// 4. Using a route the options prefer
///
/// The sort is stable: equal suggestions keep their discovery order. A
/// `none` suggestion is dropped whenever a real suggestion is present.
pub fn rank_suggestions(
    mut suggestions: Vec<Suggestion>,
    options: &SuggestOptions,
) -> Vec<Suggestion> {
    if suggestions.iter().any(|s| !s.is_no_route()) {
        suggestions.retain(|s| !s.is_no_route());
    }

    suggestions.sort_by(|a, b| compare(a, b, options));
    suggestions
}

fn compare(a: &Suggestion, b: &Suggestion, options: &SuggestOptions) -> Ordering {
    // Primary: walk-only first
    let walk_cmp = is_walk(b).cmp(&is_walk(a));
    if walk_cmp != Ordering::Equal {
        return walk_cmp;
    }

    // Secondary: less walking
    let walking_cmp = a.total_walking_m().total_cmp(&b.total_walking_m());
    if walking_cmp != Ordering::Equal {
        return walking_cmp;
    }

    // Tertiary: shorter overall
    let distance_cmp = a.total_distance_m().total_cmp(&b.total_distance_m());
    if distance_cmp != Ordering::Equal {
        return distance_cmp;
    }

    uses_preferred(b, options).cmp(&uses_preferred(a, options))
}

fn is_walk(s: &Suggestion) -> bool {
    matches!(s, Suggestion::Walk(_))
}

fn uses_preferred(s: &Suggestion, options: &SuggestOptions) -> bool {
    s.route_ids().into_iter().any(|r| options.prefers(r))
}


#[cfg(test)]
mod proptests {
    use super::tests::{direct, walk};
    use super::*;
    use proptest::prelude::*;

    fn suggestion_strategy() -> impl Strategy<Value = Suggestion> {
        prop_oneof![
            (0.0f64..500.0).prop_map(walk),
            (0u8..4, 0.0f64..300.0, 0.0f64..300.0, 0.0f64..20_000.0).prop_map(
                |(route, entry, exit, ride)| direct(&format!("r{route}"), entry, exit, ride)
            ),
        ]
    }

    proptest! {
        #[test]
        fn rank_is_sorted(suggestions in prop::collection::vec(suggestion_strategy(), 0..15)) {
            let ranked = rank_suggestions(suggestions, &SuggestOptions::default());

            for window in ranked.windows(2) {
                let (a, b) = (&window[0], &window[1]);
                let a_key = (!is_walk(a), a.total_walking_m(), a.total_distance_m());
                let b_key = (!is_walk(b), b.total_walking_m(), b.total_distance_m());
                prop_assert!(a_key <= b_key, "Not sorted: {:?} before {:?}", a_key, b_key);
            }
        }

        #[test]
        fn rank_preserves_elements(
            suggestions in prop::collection::vec(suggestion_strategy(), 0..15)
        ) {
            let original_len = suggestions.len();
            let ranked = rank_suggestions(suggestions, &SuggestOptions::default());
            prop_assert_eq!(ranked.len(), original_len);
        }
    }
}
