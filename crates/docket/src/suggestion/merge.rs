//! Applying accepted suggestions to an entry list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entry::{Record, SchemaField};
use crate::error::FieldError;

use super::suggestion::Suggestion;

/// Why a suggestion was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The entry index is outside the entry list.
    OutOfRange,
    /// The field is not part of the tool's schema.
    UnknownField,
    /// The value cannot be stored in the field.
    InvalidValue(String),
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::OutOfRange => "Entry not found",
            SkipReason::UnknownField => "Unknown field",
            SkipReason::InvalidValue(_) => "Invalid value",
        }
    }
}

/// A suggestion the merger left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSuggestion {
    pub entry_index: usize,
    pub field: String,
    pub reason: SkipReason,
}

/// Result of one merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome<R> {
    /// The revised entry list.
    pub entries: Vec<R>,
    /// Number of suggestions written.
    pub applied: usize,
    /// Suggestions left out, in input order.
    pub skipped: Vec<SkippedSuggestion>,
}

impl<R> MergeOutcome<R> {
    /// Whether every suggestion was applied.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Separate the revised entries from the report.
    pub fn split(self) -> (Vec<R>, MergeReport) {
        (
            self.entries,
            MergeReport {
                applied: self.applied,
                skipped: self.skipped,
            },
        )
    }
}

/// What a merge did, without the entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    pub applied: usize,
    pub skipped: Vec<SkippedSuggestion>,
}

/// Apply `suggestions` to a copy of `entries`.
///
/// Suggestions are applied in order, so a later suggestion for the same
/// field wins. Invalid suggestions are skipped and reported; the input list
/// is never modified.
pub fn merge<R: Record>(entries: &[R], suggestions: &[Suggestion]) -> MergeOutcome<R> {
    let mut merged = entries.to_vec();
    let mut applied = 0;
    let mut skipped = Vec::new();

    for suggestion in suggestions {
        let skip = |reason| SkippedSuggestion {
            entry_index: suggestion.entry_index,
            field: suggestion.field.clone(),
            reason,
        };

        let Some(entry) = merged.get_mut(suggestion.entry_index) else {
            skipped.push(skip(SkipReason::OutOfRange));
            continue;
        };
        let Some(field) = R::Field::parse(&suggestion.field) else {
            skipped.push(skip(SkipReason::UnknownField));
            continue;
        };

        match entry.set(field, &suggestion.suggested_value) {
            Ok(()) => applied += 1,
            Err(FieldError::UnknownField(_)) => skipped.push(skip(SkipReason::UnknownField)),
            Err(e) => skipped.push(skip(SkipReason::InvalidValue(e.to_string()))),
        }
    }

    debug!(
        tool = %R::TOOL,
        applied,
        skipped = skipped.len(),
        "Merged suggestions"
    );

    MergeOutcome {
        entries: merged,
        applied,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntityType, Party};
    use serde_json::json;

    fn entries() -> Vec<Party> {
        vec![
            Party::new("1", "Jane Doe").with_entity_type(EntityType::Individual),
            Party::new("2", "Doe Trust"),
        ]
    }

    #[test]
    fn test_empty_merge_is_identity() {
        let entries = entries();
        let outcome = merge(&entries, &[]);
        assert_eq!(outcome.entries, entries);
        assert_eq!(outcome.applied, 0);
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_applies_by_unfiltered_index() {
        let entries = entries();
        let outcome = merge(&entries, &[Suggestion::new(1, "entity_type", json!("Trust"))]);

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.entries[1].entity_type, EntityType::Trust);
        assert_eq!(entries[1].entity_type, EntityType::Unknown);
    }

    #[test]
    fn test_out_of_range_is_skipped() {
        let entries = entries();
        let outcome = merge(&entries, &[Suggestion::new(10, "primary_name", json!("X"))]);

        assert_eq!(outcome.entries, entries);
        assert_eq!(outcome.skipped[0].reason, SkipReason::OutOfRange);
    }

    #[test]
    fn test_unknown_field_and_bad_value_are_skipped() {
        let entries = entries();
        let outcome = merge(
            &entries,
            &[
                Suggestion::new(0, "favorite_color", json!("blue")),
                Suggestion::new(0, "flagged", json!("maybe")),
                Suggestion::new(0, "city", json!("Tulsa")),
            ],
        );

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].reason, SkipReason::UnknownField);
        assert!(matches!(outcome.skipped[1].reason, SkipReason::InvalidValue(_)));
        assert_eq!(outcome.entries[0].city.as_deref(), Some("Tulsa"));
        assert!(!outcome.entries[0].flagged);
    }

    #[test]
    fn test_later_suggestion_wins() {
        let outcome = merge(
            &entries(),
            &[
                Suggestion::new(0, "city", json!("Tulsa")),
                Suggestion::new(0, "city", json!("Enid")),
            ],
        );
        assert_eq!(outcome.entries[0].city.as_deref(), Some("Enid"));
    }
}
