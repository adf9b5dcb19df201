//! Export selection: keys the operator removed from export.
//!
//! Exclusions are a subtractive overlay applied after filtering. They are
//! keyed by entry key, so toggling a filter never forgets an exclusion for an
//! entry that is still (or again) visible.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entry::Record;

/// Aggregate inclusion state of the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    /// No visible entry is excluded.
    Included,
    /// Every visible entry is excluded.
    Excluded,
    /// Some visible entries are excluded.
    Mixed,
}

impl SelectionState {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionState::Included => "All selected",
            SelectionState::Excluded => "None selected",
            SelectionState::Mixed => "Some selected",
        }
    }
}

/// Set of excluded entry keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    excluded: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one key between included and excluded.
    pub fn toggle(&mut self, key: &str) {
        if !self.excluded.remove(key) {
            self.excluded.insert(key.to_string());
        }
    }

    /// Exclude every visible key if all are included, otherwise include
    /// every visible key. Keys outside `visible` are untouched.
    pub fn toggle_all<S: AsRef<str>>(&mut self, visible: &[S]) {
        if self.state(visible) == SelectionState::Included {
            self.excluded
                .extend(visible.iter().map(|k| k.as_ref().to_string()));
        } else {
            for key in visible {
                self.excluded.remove(key.as_ref());
            }
        }
    }

    /// Tri-state indicator over `visible`. An empty visible set reads as
    /// [`SelectionState::Included`].
    pub fn state<S: AsRef<str>>(&self, visible: &[S]) -> SelectionState {
        let excluded = visible
            .iter()
            .filter(|k| self.excluded.contains(k.as_ref()))
            .count();
        if excluded == 0 {
            SelectionState::Included
        } else if excluded == visible.len() {
            SelectionState::Excluded
        } else {
            SelectionState::Mixed
        }
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    /// Number of excluded keys, visible or not.
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn clear(&mut self) {
        self.excluded.clear();
    }
}

/// Visible entries that are not excluded, in visible order.
pub fn exportable<'a, R: Record>(visible: &[&'a R], selection: &Selection) -> Vec<&'a R> {
    visible
        .iter()
        .copied()
        .filter(|e| !selection.is_excluded(e.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Party;

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut selection = Selection::new();
        selection.toggle("1");
        assert!(selection.is_excluded("1"));
        selection.toggle("1");
        assert_eq!(selection, Selection::new());
    }

    #[test]
    fn test_toggle_all_from_mixed_includes_all() {
        let visible = ["1", "2", "3"];
        let mut selection = Selection::new();
        selection.toggle("2");
        assert_eq!(selection.state(&visible), SelectionState::Mixed);

        selection.toggle_all(&visible);
        assert_eq!(selection.state(&visible), SelectionState::Included);

        selection.toggle_all(&visible);
        assert_eq!(selection.state(&visible), SelectionState::Excluded);
    }

    #[test]
    fn test_toggle_all_leaves_hidden_keys_alone() {
        let mut selection = Selection::new();
        selection.toggle("9");
        selection.toggle_all(&["1", "2"]);
        selection.toggle_all(&["1", "2"]);
        assert!(selection.is_excluded("9"));
        assert_eq!(selection.excluded_count(), 1);
    }

    #[test]
    fn test_empty_visible_reads_included() {
        let mut selection = Selection::new();
        selection.toggle("1");
        assert_eq!(selection.state::<&str>(&[]), SelectionState::Included);
    }

    #[test]
    fn test_exportable_subtracts_exclusions() {
        let entries = vec![Party::new("1", "A"), Party::new("2", "B")];
        let visible: Vec<&Party> = entries.iter().collect();
        let mut selection = Selection::new();
        selection.toggle("2");

        let keys: Vec<_> = exportable(&visible, &selection)
            .into_iter()
            .map(|e| e.key())
            .collect();
        assert_eq!(keys, vec!["1"]);
    }
}
