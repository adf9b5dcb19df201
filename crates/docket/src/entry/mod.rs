//! Entry schemas for the extraction tools.
//!
//! Every tool defines its own entry type with an explicit, enumerated field
//! set. The curation engine only talks to entries through the [`Record`]
//! trait, so filtering, selection, merging and export are written once and
//! parameterized by tool.
//!
//! # Tools
//!
//! - [`Party`] - parties pulled from conveyance documents (`extract`)
//! - [`Owner`] - consolidated title owners (`title`)
//! - [`RevenueLine`] - revenue statement line items (`revenue`)

#[macro_use]
mod field;
mod owner;
mod party;
mod revenue;
mod value;

use std::borrow::Cow;
use std::fmt;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::ColumnConfig;
use crate::error::FieldError;
use crate::filter::{FilterState, Predicate};

pub use field::SchemaField;
pub use owner::{Owner, OwnerField, UNKNOWN_ADDRESS_PREFIX};
pub use party::{Party, PartyField};
pub use revenue::{Product, RevenueField, RevenueLine};

/// The record-extraction domain a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Party extraction from conveyance documents.
    Extract,
    /// Title owner consolidation.
    Title,
    /// Revenue statement parsing.
    Revenue,
}

impl ToolKind {
    /// All tools, in display order.
    pub const ALL: [ToolKind; 3] = [ToolKind::Extract, ToolKind::Title, ToolKind::Revenue];

    /// Stable identifier used in storage keys and service paths.
    pub fn slug(&self) -> &'static str {
        match self {
            ToolKind::Extract => "extract",
            ToolKind::Title => "title",
            ToolKind::Revenue => "revenue",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Extract => "Party Extraction",
            ToolKind::Title => "Title Consolidation",
            ToolKind::Revenue => "Revenue Parsing",
        }
    }

    /// Parse a slug back into a tool.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Kind of party or owner named on a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Individual,
    Trust,
    Estate,
    Corporation,
    Partnership,
    Government,
    #[default]
    Unknown,
}

impl EntityType {
    /// All entity types.
    pub const ALL: [EntityType; 7] = [
        EntityType::Individual,
        EntityType::Trust,
        EntityType::Estate,
        EntityType::Corporation,
        EntityType::Partnership,
        EntityType::Government,
        EntityType::Unknown,
    ];

    /// Get a human-readable label. Labels double as filter values.
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Individual => "Individual",
            EntityType::Trust => "Trust",
            EntityType::Estate => "Estate",
            EntityType::Corporation => "Corporation",
            EntityType::Partnership => "Partnership",
            EntityType::Government => "Government",
            EntityType::Unknown => "Unknown",
        }
    }

    /// Parse a label, ignoring case. Common business suffixes map to
    /// [`EntityType::Corporation`].
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(t) = Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(value))
        {
            return Some(t);
        }
        match value.to_ascii_lowercase().as_str() {
            "llc" | "inc" | "company" | "corp" => Some(EntityType::Corporation),
            "lp" | "llp" => Some(EntityType::Partnership),
            _ => None,
        }
    }
}

/// One extracted record of a tool.
///
/// The key returned by [`Record::key`] must be unique within a job; the
/// entry store rejects entry lists that violate this.
pub trait Record:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The tool's enumerated field set.
    type Field: SchemaField;

    /// The tool this record belongs to.
    const TOOL: ToolKind;

    /// Stable identity of the entry within its job.
    fn key(&self) -> &str;

    /// Whether extraction raised a quality concern.
    fn is_flagged(&self) -> bool;

    /// Why the entry was flagged, if known.
    fn flag_reason(&self) -> Option<&str>;

    /// Text form of a field, used by predicates and renderers.
    fn value(&self, field: Self::Field) -> Option<Cow<'_, str>>;

    /// Overwrite a field after validating the value against its type.
    fn set(&mut self, field: Self::Field, value: &Value) -> Result<(), FieldError>;

    /// Filter predicates offered for this tool.
    fn predicates() -> Vec<Predicate<Self::Field>>;

    /// Filter values applied when a job becomes active or filters reset.
    fn default_filters() -> FilterState;

    /// Display columns for this tool.
    fn columns() -> ColumnConfig;

    /// Write a field addressed by wire name.
    fn set_named(&mut self, field: &str, value: &Value) -> Result<(), FieldError> {
        let field =
            Self::Field::parse(field).ok_or_else(|| FieldError::UnknownField(field.to_string()))?;
        self.set(field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_slugs_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_slug(tool.slug()), Some(tool));
        }
        assert_eq!(ToolKind::from_slug("proration"), None);
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("individual"), Some(EntityType::Individual));
        assert_eq!(EntityType::parse(" TRUST "), Some(EntityType::Trust));
        assert_eq!(EntityType::parse("LLC"), Some(EntityType::Corporation));
        assert_eq!(EntityType::parse("cooperative"), None);
        assert_eq!(EntityType::default(), EntityType::Unknown);
    }

    #[test]
    fn test_set_named_rejects_unknown_field() {
        let mut party = Party::new("1", "Jane Doe");
        let err = party
            .set_named("favorite_color", &Value::from("blue"))
            .unwrap_err();
        assert_eq!(err, FieldError::UnknownField("favorite_color".to_string()));
    }
}
