//! Predicate kinds a tool can register.

use regex::Regex;

use crate::entry::{Record, SchemaField};

use super::state::FilterValue;

/// What a predicate tests.
#[derive(Debug, Clone)]
pub enum PredicateKind<F> {
    /// Switch; when on, keep entries whose field is one of `values`.
    OneOf { field: F, values: Vec<String> },
    /// Category set; keep entries whose field is in the chosen set.
    Category { field: F },
    /// Switch; when on, drop flagged entries.
    HideFlagged,
    /// Switch; when on, drop entries whose key matches `pattern`.
    HideKeyPattern { pattern: Regex },
    /// Choice; keep entries whose field equals the chosen value.
    Exact { field: F },
}

/// A named filter predicate.
#[derive(Debug, Clone)]
pub struct Predicate<F> {
    name: &'static str,
    kind: PredicateKind<F>,
}

impl<F: SchemaField> Predicate<F> {
    pub fn new(name: &'static str, kind: PredicateKind<F>) -> Self {
        Self { name, kind }
    }

    /// Membership switch over a fixed list of categories.
    pub fn one_of(name: &'static str, field: F, values: &[&str]) -> Self {
        Self::new(
            name,
            PredicateKind::OneOf {
                field,
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    /// Membership filter over a chosen set of categories.
    pub fn category(name: &'static str, field: F) -> Self {
        Self::new(name, PredicateKind::Category { field })
    }

    /// Exclude-if-flagged switch.
    pub fn hide_flagged(name: &'static str) -> Self {
        Self::new(name, PredicateKind::HideFlagged)
    }

    /// Exclude-by-key-pattern switch.
    pub fn hide_key_pattern(name: &'static str, pattern: Regex) -> Self {
        Self::new(name, PredicateKind::HideKeyPattern { pattern })
    }

    /// Exact match over a free-text grouping field.
    pub fn exact(name: &'static str, field: F) -> Self {
        Self::new(name, PredicateKind::Exact { field })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &PredicateKind<F> {
        &self.kind
    }

    /// Whether `entry` passes this predicate under `value`.
    ///
    /// A missing value, or a value of a shape this predicate does not take,
    /// imposes no constraint.
    pub fn admits<R>(&self, entry: &R, value: Option<&FilterValue>) -> bool
    where
        R: Record<Field = F>,
    {
        let Some(value) = value else {
            return true;
        };
        match (&self.kind, value) {
            (PredicateKind::OneOf { field, values }, FilterValue::Flag(true)) => entry
                .value(*field)
                .is_some_and(|v| values.iter().any(|accepted| v == accepted.as_str())),
            (PredicateKind::Category { field }, FilterValue::Set(set)) if !set.is_empty() => entry
                .value(*field)
                .is_some_and(|v| set.contains(&*v)),
            (PredicateKind::HideFlagged, FilterValue::Flag(true)) => !entry.is_flagged(),
            (PredicateKind::HideKeyPattern { pattern }, FilterValue::Flag(true)) => {
                !pattern.is_match(entry.key())
            }
            (PredicateKind::Exact { field }, FilterValue::Choice(Some(chosen))) => {
                entry.value(*field).is_some_and(|v| v == chosen.as_str())
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntityType, Owner, OwnerField};

    fn owner(key: &str, section: &str) -> Owner {
        Owner::new(key, "A. Smith", section)
    }

    #[test]
    fn test_missing_value_admits() {
        let p = Predicate::<OwnerField>::hide_flagged("hideFlagged");
        let entry = owner("S1-1", "S1").flagged("bad OCR");
        assert!(p.admits(&entry, None));
        assert!(p.admits(&entry, Some(&FilterValue::Flag(false))));
        assert!(!p.admits(&entry, Some(&FilterValue::Flag(true))));
    }

    #[test]
    fn test_key_pattern() {
        let p = Predicate::<OwnerField>::hide_key_pattern(
            "hideUnknownAddress",
            Regex::new("^UNKNOWN").unwrap(),
        );
        let on = FilterValue::Flag(true);
        assert!(!p.admits(&owner("UNKNOWN-1", "S1"), Some(&on)));
        assert!(p.admits(&owner("S1-1", "S1"), Some(&on)));
    }

    #[test]
    fn test_category_empty_set_admits_all() {
        let p = Predicate::category("entityTypes", OwnerField::EntityType);
        let trust = owner("S1-1", "S1").with_entity_type(EntityType::Trust);

        assert!(p.admits(&trust, Some(&FilterValue::Set(Default::default()))));
        let only_estates = FilterValue::Set(["Estate".to_string()].into());
        assert!(!p.admits(&trust, Some(&only_estates)));
        let trusts = FilterValue::Set(["Trust".to_string(), "Estate".to_string()].into());
        assert!(p.admits(&trust, Some(&trusts)));
    }

    #[test]
    fn test_exact_match() {
        let p = Predicate::exact("selectedSection", OwnerField::LegalDescription);
        let entry = owner("S1-1", "S1-T2N-R3W");
        assert!(p.admits(&entry, Some(&FilterValue::Choice(None))));
        assert!(p.admits(&entry, Some(&FilterValue::Choice(Some("S1-T2N-R3W".into())))));
        assert!(!p.admits(&entry, Some(&FilterValue::Choice(Some("S1".into())))));
    }

    #[test]
    fn test_mismatched_value_shape_is_ignored() {
        let p = Predicate::<OwnerField>::hide_flagged("hideFlagged");
        let entry = owner("S1-1", "S1").flagged("bad OCR");
        assert!(p.admits(&entry, Some(&FilterValue::Choice(Some("yes".into())))));
    }
}
