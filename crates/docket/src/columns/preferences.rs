//! Per-user, per-tool visible column preferences.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::entry::ToolKind;
use crate::error::{DocketError, Result};

use super::column::{Column, ColumnConfig};

/// Durable keyed storage for visible column sets.
///
/// Writes are last-writer-wins; no locking across processes.
pub trait PreferenceStore: Send + Sync {
    /// Stored set for `(user, tool)`, or `None` if never set.
    fn get(&self, user: &str, tool: ToolKind) -> Result<Option<BTreeSet<String>>>;

    /// Replace the stored set for `(user, tool)`.
    fn set(&self, user: &str, tool: ToolKind, columns: &BTreeSet<String>) -> Result<()>;
}

type PreferenceMap = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    sets: Mutex<PreferenceMap>,
    writes: AtomicU64,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, PreferenceMap>> {
        self.sets
            .lock()
            .map_err(|_| DocketError::Persistence("preference store lock poisoned".to_string()))
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, user: &str, tool: ToolKind) -> Result<Option<BTreeSet<String>>> {
        Ok(self
            .lock()?
            .get(user)
            .and_then(|tools| tools.get(tool.slug()))
            .cloned())
    }

    fn set(&self, user: &str, tool: ToolKind, columns: &BTreeSet<String>) -> Result<()> {
        self.lock()?
            .entry(user.to_string())
            .or_default()
            .insert(tool.slug().to_string(), columns.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Preference store backed by one JSON document.
///
/// Layout: `{ "<user>": { "<tool>": ["column", ...] } }`.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<PreferenceMap> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PreferenceMap::new()),
            Err(e) => {
                return Err(DocketError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DocketError::Persistence(format!(
                "Failed to parse preferences '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write(&self, map: &PreferenceMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    DocketError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| DocketError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, map)?;
        writer.flush().map_err(|e| DocketError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| DocketError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, user: &str, tool: ToolKind) -> Result<Option<BTreeSet<String>>> {
        let mut map = self.read()?;
        Ok(map
            .get_mut(user)
            .and_then(|tools| tools.remove(tool.slug())))
    }

    fn set(&self, user: &str, tool: ToolKind, columns: &BTreeSet<String>) -> Result<()> {
        let mut map = match self.read() {
            Ok(map) => map,
            Err(DocketError::Persistence(message)) => {
                warn!(path = %self.path.display(), %message, "Replacing unreadable preferences");
                PreferenceMap::new()
            }
            Err(e) => return Err(e),
        };
        map.entry(user.to_string())
            .or_default()
            .insert(tool.slug().to_string(), columns.clone());
        self.write(&map)
    }
}

/// Column preferences for one tool, applying the tool's column rules on
/// top of a [`PreferenceStore`].
#[derive(Clone)]
pub struct ColumnPreferences {
    store: Arc<dyn PreferenceStore>,
    tool: ToolKind,
    config: ColumnConfig,
}

impl ColumnPreferences {
    pub fn new(store: Arc<dyn PreferenceStore>, tool: ToolKind, config: ColumnConfig) -> Self {
        Self {
            store,
            tool,
            config,
        }
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// Visible toggleable columns for `user`.
    ///
    /// Falls back to the tool defaults when nothing is stored or the store
    /// cannot be read. Never writes.
    pub fn get_visible(&self, user: &str) -> BTreeSet<String> {
        match self.store.get(user, self.tool) {
            Ok(Some(stored)) => self.config.sanitize(&stored),
            Ok(None) => self.config.default_visible(),
            Err(e) => {
                warn!(user, tool = %self.tool, error = %e, "Falling back to default columns");
                self.config.default_visible()
            }
        }
    }

    /// Store a visible set for `user`. Mandatory and unknown keys are
    /// dropped before writing. Returns the stored set.
    pub fn set_visible(&self, user: &str, columns: &BTreeSet<String>) -> Result<BTreeSet<String>> {
        let sanitized = self.config.sanitize(columns);
        self.store.set(user, self.tool, &sanitized)?;
        debug!(user, tool = %self.tool, count = sanitized.len(), "Stored column preference");
        Ok(sanitized)
    }

    /// Show or hide one toggleable column.
    pub fn set_column(&self, user: &str, key: &str, visible: bool) -> Result<BTreeSet<String>> {
        match self.config.get(key) {
            None => {
                return Err(DocketError::Validation(format!("Unknown column '{}'", key)));
            }
            Some(column) if column.always_visible => {
                return Err(DocketError::Validation(format!(
                    "Column '{}' is always visible",
                    key
                )));
            }
            Some(_) => {}
        }

        let mut columns = self.get_visible(user);
        if visible {
            columns.insert(key.to_string());
        } else {
            columns.remove(key);
        }
        self.set_visible(user, &columns)
    }

    /// Columns to render for `user`, in display order.
    pub fn visible_columns(&self, user: &str) -> Vec<Column> {
        let visible = self.get_visible(user);
        self.config
            .visible_columns(&visible)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config() -> ColumnConfig {
        ColumnConfig::new()
            .pinned("full_name", "Owner")
            .shown("city", "City")
            .hidden("notes", "Notes")
    }

    fn keys(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _: &str, _: ToolKind) -> Result<Option<BTreeSet<String>>> {
            Err(DocketError::Persistence("disk on fire".to_string()))
        }

        fn set(&self, _: &str, _: ToolKind, _: &BTreeSet<String>) -> Result<()> {
            Err(DocketError::Persistence("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_first_use_returns_defaults_without_writing() {
        let store = Arc::new(MemoryPreferences::new());
        let prefs = ColumnPreferences::new(store.clone(), ToolKind::Title, config());

        assert_eq!(prefs.get_visible("ops@example.com"), keys(&["city"]));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_set_column_persists_and_strips_mandatory() {
        let store = Arc::new(MemoryPreferences::new());
        let prefs = ColumnPreferences::new(store.clone(), ToolKind::Title, config());

        prefs.set_column("ops", "notes", true).unwrap();
        assert_eq!(prefs.get_visible("ops"), keys(&["city", "notes"]));
        assert_eq!(store.writes(), 1);

        let stored = prefs.set_visible("ops", &keys(&["full_name", "notes"])).unwrap();
        assert_eq!(stored, keys(&["notes"]));
    }

    #[test]
    fn test_mandatory_column_cannot_be_toggled() {
        let prefs = ColumnPreferences::new(
            Arc::new(MemoryPreferences::new()),
            ToolKind::Title,
            config(),
        );
        assert!(matches!(
            prefs.set_column("ops", "full_name", false),
            Err(DocketError::Validation(_))
        ));
        assert!(prefs.set_column("ops", "shoe_size", true).is_err());
    }

    #[test]
    fn test_read_failure_falls_back_to_defaults() {
        let prefs = ColumnPreferences::new(Arc::new(BrokenStore), ToolKind::Title, config());
        assert_eq!(prefs.get_visible("ops"), keys(&["city"]));
    }

    #[test]
    fn test_preferences_are_keyed_by_user_and_tool() {
        let store = MemoryPreferences::new();
        store.set("a", ToolKind::Title, &keys(&["notes"])).unwrap();

        assert_eq!(store.get("a", ToolKind::Title).unwrap(), Some(keys(&["notes"])));
        assert_eq!(store.get("a", ToolKind::Revenue).unwrap(), None);
        assert_eq!(store.get("b", ToolKind::Title).unwrap(), None);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs").join("columns.json");
        let store = JsonFilePreferences::new(&path);

        assert_eq!(store.get("ops", ToolKind::Extract).unwrap(), None);
        store.set("ops", ToolKind::Extract, &keys(&["city"])).unwrap();
        store.set("ops", ToolKind::Title, &keys(&["notes"])).unwrap();

        let reopened = JsonFilePreferences::new(&path);
        assert_eq!(
            reopened.get("ops", ToolKind::Extract).unwrap(),
            Some(keys(&["city"]))
        );
        assert_eq!(
            reopened.get("ops", ToolKind::Title).unwrap(),
            Some(keys(&["notes"]))
        );
    }

    #[test]
    fn test_json_file_write_is_complete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("columns.json");
        let store = JsonFilePreferences::new(&path);
        let many: BTreeSet<String> = (0..500).map(|i| format!("column_{:03}", i)).collect();

        store.set("ops", ToolKind::Revenue, &many).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let decoded: PreferenceMap = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded["ops"]["revenue"].len(), 500);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_error_and_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("columns.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonFilePreferences::new(&path);

        assert!(matches!(
            store.get("ops", ToolKind::Title),
            Err(DocketError::Persistence(_))
        ));

        store.set("ops", ToolKind::Title, &keys(&["notes"])).unwrap();
        assert_eq!(
            store.get("ops", ToolKind::Title).unwrap(),
            Some(keys(&["notes"]))
        );
    }
}
