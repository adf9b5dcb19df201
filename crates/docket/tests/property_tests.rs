//! Property-based tests for filtering, selection and merging.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p docket --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p docket --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::json;

use docket::entry::{EntityType, Owner, Party, Record};
use docket::filter::{names, FilterEngine, FilterState};
use docket::selection::{exportable, Selection, SelectionState};
use docket::suggestion::{merge, Suggestion};

// =============================================================================
// Test Strategies
// =============================================================================

fn entity_type() -> impl Strategy<Value = EntityType> {
    prop::sample::select(EntityType::ALL.to_vec())
}

/// Parties with unique keys and random type/flag.
fn parties() -> impl Strategy<Value = Vec<Party>> {
    prop::collection::vec((entity_type(), any::<bool>()), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (entity_type, flagged))| {
                let party = Party::new(i.to_string(), format!("Party {}", i))
                    .with_entity_type(entity_type);
                if flagged {
                    party.flagged("review")
                } else {
                    party
                }
            })
            .collect()
    })
}

/// Owners whose keys sometimes carry the unknown-address prefix.
fn owners() -> impl Strategy<Value = Vec<Owner>> {
    prop::collection::vec((any::<bool>(), 0..3usize, any::<bool>()), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (unknown, section, flagged))| {
                let key = if unknown {
                    format!("UNKNOWN-{}", i)
                } else {
                    format!("K-{}", i)
                };
                let owner = Owner::new(key, format!("Owner {}", i), format!("S{}", section));
                if flagged {
                    owner.flagged("review")
                } else {
                    owner
                }
            })
            .collect()
    })
}

fn keys<R: Record>(entries: &[&R]) -> Vec<String> {
    entries.iter().map(|e| e.key().to_string()).collect()
}

// =============================================================================
// Filter Properties
// =============================================================================

proptest! {
    /// Filtering by two states over disjoint predicates equals filtering by
    /// one, then the other.
    #[test]
    fn filter_composition_is_sequential(
        entries in parties(),
        individuals in any::<bool>(),
        hide_flagged in any::<bool>(),
    ) {
        let engine = FilterEngine::<Party>::new();
        let f1 = FilterState::new().with_flag(names::INDIVIDUALS_ONLY, individuals);
        let f2 = FilterState::new().with_flag(names::HIDE_FLAGGED, hide_flagged);

        let combined = engine.visible(&entries, &f1.and(&f2));
        let first: Vec<Party> = engine.visible(&entries, &f1).into_iter().cloned().collect();
        let sequential = engine.visible(&first, &f2);

        prop_assert_eq!(keys(&combined), keys(&sequential));
    }

    /// The visible set does not depend on which predicate is evaluated first.
    #[test]
    fn filter_order_independent(
        entries in owners(),
        hide_unknown in any::<bool>(),
        section in prop::option::of(0..3usize),
    ) {
        let engine = FilterEngine::<Owner>::new();
        let f1 = FilterState::new().with_flag(names::HIDE_UNKNOWN_ADDRESS, hide_unknown);
        let f2 = FilterState::new()
            .with_choice(names::SELECTED_SECTION, section.map(|s| format!("S{}", s)));

        let a: Vec<Owner> = engine.visible(&entries, &f1).into_iter().cloned().collect();
        let b: Vec<Owner> = engine.visible(&entries, &f2).into_iter().cloned().collect();

        prop_assert_eq!(
            keys(&engine.visible(&a, &f2)),
            keys(&engine.visible(&b, &f1))
        );
    }

    /// Visible entries keep their original relative order.
    #[test]
    fn visible_preserves_order(entries in parties(), hide_flagged in any::<bool>()) {
        let engine = FilterEngine::<Party>::new();
        let filters = FilterState::new().with_flag(names::HIDE_FLAGGED, hide_flagged);
        let indices = engine.visible_indices(&entries, &filters);
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Selection Properties
// =============================================================================

proptest! {
    #[test]
    fn toggle_is_self_inverse(
        excluded in prop::collection::hash_set("[0-9]{1,2}", 0..10),
        key in "[0-9]{1,2}",
    ) {
        let mut selection = Selection::new();
        for k in &excluded {
            selection.toggle(k);
        }
        let before = selection.clone();
        selection.toggle(&key);
        selection.toggle(&key);
        prop_assert_eq!(selection, before);
    }

    #[test]
    fn exportable_is_subset_of_visible(
        entries in parties(),
        exclude in prop::collection::vec(any::<bool>(), 40),
    ) {
        let engine = FilterEngine::<Party>::new();
        let filters = FilterState::new().with_flag(names::HIDE_FLAGGED, true);
        let visible = engine.visible(&entries, &filters);

        let mut selection = Selection::new();
        prop_assert_eq!(keys(&exportable(&visible, &selection)), keys(&visible));

        for (entry, excluded) in entries.iter().zip(exclude) {
            if excluded {
                selection.toggle(entry.key());
            }
        }
        let visible_keys = keys(&visible);
        let exported = keys(&exportable(&visible, &selection));
        prop_assert!(exported.iter().all(|k| visible_keys.contains(k)));
        prop_assert!(exported.iter().all(|k| !selection.is_excluded(k)));
    }

    #[test]
    fn toggle_all_twice_never_mixed(
        entries in parties(),
        excluded in prop::collection::vec(any::<bool>(), 40),
    ) {
        let visible: Vec<String> = entries.iter().map(|e| e.key().to_string()).collect();
        let mut selection = Selection::new();
        for (key, excluded) in visible.iter().zip(excluded) {
            if excluded {
                selection.toggle(key);
            }
        }

        selection.toggle_all(&visible);
        prop_assert_ne!(selection.state(&visible), SelectionState::Mixed);
    }
}

// =============================================================================
// Merge Properties
// =============================================================================

proptest! {
    #[test]
    fn empty_merge_is_identity(entries in parties()) {
        let outcome = merge(&entries, &[]);
        prop_assert_eq!(outcome.entries, entries);
        prop_assert_eq!(outcome.applied, 0);
    }

    #[test]
    fn out_of_range_merge_changes_nothing(entries in parties(), offset in 0..100usize) {
        let suggestion = Suggestion::new(entries.len() + offset, "primary_name", json!("X"));
        let outcome = merge(&entries, &[suggestion]);
        prop_assert_eq!(outcome.entries, entries);
        prop_assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn merge_never_changes_keys(
        entries in parties(),
        index in 0..40usize,
        name in "[A-Za-z ]{1,20}",
    ) {
        let suggestions = vec![
            Suggestion::new(index, "primary_name", json!(name)),
            Suggestion::new(index, "entry_number", json!("999")),
        ];
        let outcome = merge(&entries, &suggestions);
        let before: Vec<&str> = entries.iter().map(|e| e.key()).collect();
        let after: Vec<&str> = outcome.entries.iter().map(|e| e.key()).collect();
        prop_assert_eq!(before, after);
    }
}
