//! Display columns and per-user column preferences.
//!
//! Each tool declares an ordered [`ColumnConfig`]. Mandatory columns are
//! always shown; the remaining columns can be toggled per user and the
//! choice is remembered per `(user, tool)` through a [`PreferenceStore`].

mod column;
mod preferences;

pub use column::{Column, ColumnConfig};
pub use preferences::{
    ColumnPreferences, JsonFilePreferences, MemoryPreferences, PreferenceStore,
};
