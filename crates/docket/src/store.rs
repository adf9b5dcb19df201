//! Entry store: the loaded entries of one job.
//!
//! Published snapshots are never mutated. Every edit or merge produces a new
//! snapshot and bumps the revision, so a caller holding a snapshot keeps a
//! consistent view and the session can memoize on the revision.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::entry::Record;
use crate::error::{DocketError, Result};

/// Default number of snapshots kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Versioned entry list with undo history.
#[derive(Debug, Clone)]
pub struct EntryStore<R> {
    current: Arc<Vec<R>>,
    history: Vec<Arc<Vec<R>>>,
    history_limit: usize,
    revision: u64,
}

impl<R: Record> EntryStore<R> {
    /// Create a store, rejecting entry lists with duplicate keys.
    pub fn new(entries: Vec<R>) -> Result<Self> {
        validate_keys(&entries)?;
        Ok(Self {
            current: Arc::new(entries),
            history: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            revision: 0,
        })
    }

    /// Set how many prior snapshots are kept for undo.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn entries(&self) -> &[R] {
        &self.current
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.current)
    }

    /// Incremented on every transition, including undo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.current.get(index)
    }

    pub fn flagged_count(&self) -> usize {
        self.current.iter().filter(|e| e.is_flagged()).count()
    }

    /// Overwrite one field of one entry, addressed by position in the
    /// unfiltered list.
    pub fn edit(&mut self, index: usize, field: &str, value: &Value) -> Result<()> {
        let len = self.current.len();
        let entry = self
            .current
            .get(index)
            .ok_or(DocketError::IndexOutOfRange { index, len })?;

        let mut updated = entry.clone();
        updated.set_named(field, value)?;

        let mut next = Vec::clone(&self.current);
        next[index] = updated;
        self.publish(next);
        debug!(index, field, revision = self.revision, "Edited entry");
        Ok(())
    }

    /// Publish a new entry list as one transition.
    pub fn replace(&mut self, entries: Vec<R>) -> Result<()> {
        validate_keys(&entries)?;
        self.publish(entries);
        Ok(())
    }

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                self.revision += 1;
                debug!(revision = self.revision, "Undid last change");
                true
            }
            None => false,
        }
    }

    /// Number of transitions that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    fn publish(&mut self, entries: Vec<R>) {
        let previous = std::mem::replace(&mut self.current, Arc::new(entries));
        self.history.push(previous);
        self.trim_history();
        self.revision += 1;
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }
    }
}

fn validate_keys<R: Record>(entries: &[R]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.key()) {
            return Err(DocketError::DuplicateKey {
                key: entry.key().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntityType, Party};
    use serde_json::json;

    fn store() -> EntryStore<Party> {
        EntryStore::new(vec![Party::new("1", "A"), Party::new("2", "B")]).unwrap()
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = EntryStore::new(vec![Party::new("1", "A"), Party::new("1", "B")]).unwrap_err();
        assert!(matches!(err, DocketError::DuplicateKey { key } if key == "1"));
    }

    #[test]
    fn test_edit_publishes_new_snapshot() {
        let mut store = store();
        let before = store.snapshot();

        store.edit(1, "entity_type", &json!("Estate")).unwrap();

        assert_eq!(store.revision(), 1);
        assert_eq!(before[1].entity_type, EntityType::Unknown);
        assert_eq!(store.entries()[1].entity_type, EntityType::Estate);
    }

    #[test]
    fn test_rejected_edit_changes_nothing() {
        let mut store = store();
        assert!(matches!(
            store.edit(5, "primary_name", &json!("X")),
            Err(DocketError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            store.edit(0, "entity_type", &json!("Dragon")),
            Err(DocketError::Field(_))
        ));
        assert_eq!(store.revision(), 0);
        assert_eq!(store.undo_depth(), 0);
    }

    #[test]
    fn test_undo_restores_previous() {
        let mut store = store();
        store.edit(0, "primary_name", &json!("Z")).unwrap();
        assert!(store.undo());
        assert_eq!(store.entries()[0].primary_name, "A");
        assert_eq!(store.revision(), 2);
        assert!(!store.undo());
    }

    #[test]
    fn test_history_limit() {
        let mut store = store().with_history_limit(2);
        for name in ["X", "Y", "Z"] {
            store.edit(0, "primary_name", &json!(name)).unwrap();
        }
        assert_eq!(store.undo_depth(), 2);
        store.undo();
        store.undo();
        assert_eq!(store.entries()[0].primary_name, "X");
    }
}
