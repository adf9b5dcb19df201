//! Column definitions for a tool's entry table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One display column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Field key, matching the entry's serialized field name.
    pub key: String,

    /// Header label.
    pub label: String,

    /// Mandatory columns are always shown and cannot be toggled.
    #[serde(default)]
    pub always_visible: bool,
}

/// Ordered columns of a tool plus the default visible set.
///
/// The default set only ever names toggleable columns; mandatory columns
/// are shown regardless of any set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnConfig {
    columns: Vec<Column>,
    defaults: BTreeSet<String>,
}

impl ColumnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mandatory column.
    pub fn pinned(self, key: &str, label: &str) -> Self {
        self.push(key, label, true, false)
    }

    /// Append a toggleable column shown by default.
    pub fn shown(self, key: &str, label: &str) -> Self {
        self.push(key, label, false, true)
    }

    /// Append a toggleable column hidden by default.
    pub fn hidden(self, key: &str, label: &str) -> Self {
        self.push(key, label, false, false)
    }

    fn push(mut self, key: &str, label: &str, always_visible: bool, default: bool) -> Self {
        self.columns.push(Column {
            key: key.to_string(),
            label: label.to_string(),
            always_visible,
        });
        if default {
            self.defaults.insert(key.to_string());
        }
        self
    }

    /// All columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Columns offered in the column picker.
    pub fn toggleable(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.always_visible)
    }

    /// Toggleable columns visible when a user has no stored preference.
    pub fn default_visible(&self) -> BTreeSet<String> {
        self.defaults.clone()
    }

    /// Keep only keys of toggleable columns.
    pub fn sanitize(&self, keys: &BTreeSet<String>) -> BTreeSet<String> {
        keys.iter()
            .filter(|k| self.get(k).is_some_and(|c| !c.always_visible))
            .cloned()
            .collect()
    }

    /// Columns to render for a visible set: mandatory columns plus the
    /// chosen ones, in display order.
    pub fn visible_columns(&self, visible: &BTreeSet<String>) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.always_visible || visible.contains(&c.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ColumnConfig {
        ColumnConfig::new()
            .pinned("name", "Name")
            .shown("city", "City")
            .hidden("notes", "Notes")
    }

    #[test]
    fn test_defaults_exclude_mandatory() {
        let config = config();
        assert_eq!(config.default_visible(), BTreeSet::from(["city".to_string()]));
        assert_eq!(
            config.toggleable().map(|c| c.key.as_str()).collect::<Vec<_>>(),
            vec!["city", "notes"]
        );
    }

    #[test]
    fn test_sanitize_strips_unknown_and_mandatory() {
        let config = config();
        let keys: BTreeSet<String> = ["name", "notes", "shoe_size"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(config.sanitize(&keys), BTreeSet::from(["notes".to_string()]));
    }

    #[test]
    fn test_visible_columns_keep_order() {
        let config = config();
        let visible = BTreeSet::from(["notes".to_string()]);
        let keys: Vec<_> = config
            .visible_columns(&visible)
            .into_iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["name", "notes"]);
    }
}
