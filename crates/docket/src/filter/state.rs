//! Filter values keyed by predicate name.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Value assigned to one predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// On/off switch.
    Flag(bool),
    /// A single chosen value, or no choice.
    Choice(Option<String>),
    /// A set of accepted categories; empty means no constraint.
    Set(BTreeSet<String>),
}

impl FilterValue {
    /// Whether this value constrains anything at all.
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Flag(on) => *on,
            FilterValue::Choice(choice) => choice.is_some(),
            FilterValue::Set(set) => !set.is_empty(),
        }
    }
}

/// Predicate values for one session, keyed by predicate name.
///
/// Order-independent: two states with the same assignments are equal no
/// matter how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, FilterValue>);

impl FilterState {
    /// Create an empty filter state (every predicate off).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a switch.
    pub fn with_flag(mut self, name: impl Into<String>, on: bool) -> Self {
        self.set_flag(name, on);
        self
    }

    /// Set a single choice.
    pub fn with_choice(mut self, name: impl Into<String>, choice: Option<String>) -> Self {
        self.set_choice(name, choice);
        self
    }

    /// Set an accepted category set.
    pub fn with_set<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_categories(name, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn set_flag(&mut self, name: impl Into<String>, on: bool) {
        self.0.insert(name.into(), FilterValue::Flag(on));
    }

    pub fn set_choice(&mut self, name: impl Into<String>, choice: Option<String>) {
        self.0.insert(name.into(), FilterValue::Choice(choice));
    }

    pub fn set_categories(&mut self, name: impl Into<String>, values: BTreeSet<String>) {
        self.0.insert(name.into(), FilterValue::Set(values));
    }

    /// Add or remove one category from a set-valued predicate.
    ///
    /// A predicate holding a non-set value is replaced by a set.
    pub fn toggle_category(&mut self, name: &str, value: &str) {
        let entry = self
            .0
            .entry(name.to_string())
            .or_insert_with(|| FilterValue::Set(BTreeSet::new()));
        if !matches!(entry, FilterValue::Set(_)) {
            *entry = FilterValue::Set(BTreeSet::new());
        }
        if let FilterValue::Set(set) = entry {
            if !set.remove(value) {
                set.insert(value.to_string());
            }
        }
    }

    /// Get the value assigned to a predicate.
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.get(name)
    }

    /// Read a switch; unset switches are off.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(FilterValue::Flag(true)))
    }

    /// Remove a predicate's value.
    pub fn clear(&mut self, name: &str) -> Option<FilterValue> {
        self.0.remove(name)
    }

    /// Combine two states. Values in `other` win on conflicting names.
    pub fn and(&self, other: &FilterState) -> FilterState {
        let mut combined = self.clone();
        for (name, value) in &other.0 {
            combined.0.insert(name.clone(), value.clone());
        }
        combined
    }

    /// Names with a value that constrains the visible set.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, v)| v.is_active())
            .map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
