//! Owner records from the title consolidation tool.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::ColumnConfig;
use crate::error::FieldError;
use crate::filter::{names, FilterState, Predicate};

use super::{value, EntityType, Record, ToolKind};

/// Key prefix title consolidation assigns to owners without a usable
/// mailing address.
pub const UNKNOWN_ADDRESS_PREFIX: &str = "UNKNOWN";

static UNKNOWN_ADDRESS_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", regex::escape(UNKNOWN_ADDRESS_PREFIX)))
        .expect("unknown-address pattern is valid")
});

schema_fields! {
    /// Editable fields of an [`Owner`].
    pub enum OwnerField {
        FullName => "full_name",
        FirstName => "first_name",
        LastName => "last_name",
        EntityType => "entity_type",
        Address => "address",
        AddressLine2 => "address_line_2",
        City => "city",
        State => "state",
        ZipCode => "zip_code",
        LegalDescription => "legal_description",
        Notes => "notes",
        Flagged => "flagged",
        FlagReason => "flag_reason",
    }
}

/// A consolidated title owner.
///
/// The key is a composite index built during consolidation (for example
/// `S12-004`); owners whose address could not be resolved carry the
/// [`UNKNOWN_ADDRESS_PREFIX`] instead of a section prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub key: String,

    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default)]
    pub entity_type: EntityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    /// Legal description (section/township/range) the owner was found under.
    #[serde(default)]
    pub legal_description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub flagged: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

impl Owner {
    /// Create an unflagged owner under a legal description.
    pub fn new(
        key: impl Into<String>,
        full_name: impl Into<String>,
        legal_description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            full_name: full_name.into(),
            first_name: None,
            last_name: None,
            entity_type: EntityType::Unknown,
            address: None,
            address_line_2: None,
            city: None,
            state: None,
            zip_code: None,
            legal_description: legal_description.into(),
            notes: None,
            flagged: false,
            flag_reason: None,
        }
    }

    /// Set the entity type.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = entity_type;
        self
    }

    /// Flag the owner for review.
    pub fn flagged(mut self, reason: impl Into<String>) -> Self {
        self.flagged = true;
        self.flag_reason = Some(reason.into());
        self
    }

    /// Whether consolidation could not resolve a mailing address.
    ///
    /// Derived from the key prefix, the same signal the
    /// `hideUnknownAddress` filter uses.
    pub fn has_unknown_address(&self) -> bool {
        UNKNOWN_ADDRESS_KEY.is_match(&self.key)
    }
}

impl Record for Owner {
    type Field = OwnerField;

    const TOOL: ToolKind = ToolKind::Title;

    fn key(&self) -> &str {
        &self.key
    }

    fn is_flagged(&self) -> bool {
        self.flagged
    }

    fn flag_reason(&self) -> Option<&str> {
        self.flag_reason.as_deref()
    }

    fn value(&self, field: OwnerField) -> Option<Cow<'_, str>> {
        match field {
            OwnerField::FullName => Some(Cow::Borrowed(self.full_name.as_str())),
            OwnerField::FirstName => borrowed(&self.first_name),
            OwnerField::LastName => borrowed(&self.last_name),
            OwnerField::EntityType => Some(Cow::Borrowed(self.entity_type.label())),
            OwnerField::Address => borrowed(&self.address),
            OwnerField::AddressLine2 => borrowed(&self.address_line_2),
            OwnerField::City => borrowed(&self.city),
            OwnerField::State => borrowed(&self.state),
            OwnerField::ZipCode => borrowed(&self.zip_code),
            OwnerField::LegalDescription => Some(Cow::Borrowed(self.legal_description.as_str())),
            OwnerField::Notes => borrowed(&self.notes),
            OwnerField::Flagged => Some(Cow::Borrowed(if self.flagged { "true" } else { "false" })),
            OwnerField::FlagReason => borrowed(&self.flag_reason),
        }
    }

    fn set(&mut self, field: OwnerField, v: &Value) -> Result<(), FieldError> {
        match field {
            OwnerField::FullName => self.full_name = value::text("full_name", v)?,
            OwnerField::FirstName => self.first_name = value::optional_text("first_name", v)?,
            OwnerField::LastName => self.last_name = value::optional_text("last_name", v)?,
            OwnerField::EntityType => self.entity_type = value::entity_type("entity_type", v)?,
            OwnerField::Address => self.address = value::optional_text("address", v)?,
            OwnerField::AddressLine2 => {
                self.address_line_2 = value::optional_text("address_line_2", v)?
            }
            OwnerField::City => self.city = value::optional_text("city", v)?,
            OwnerField::State => self.state = value::optional_text("state", v)?,
            OwnerField::ZipCode => self.zip_code = value::optional_text("zip_code", v)?,
            OwnerField::LegalDescription => {
                self.legal_description = value::text("legal_description", v)?
            }
            OwnerField::Notes => self.notes = value::optional_text("notes", v)?,
            OwnerField::Flagged => self.flagged = value::boolean("flagged", v)?,
            OwnerField::FlagReason => self.flag_reason = value::optional_text("flag_reason", v)?,
        }
        Ok(())
    }

    fn predicates() -> Vec<Predicate<OwnerField>> {
        vec![
            Predicate::hide_flagged(names::HIDE_FLAGGED),
            Predicate::hide_key_pattern(names::HIDE_UNKNOWN_ADDRESS, UNKNOWN_ADDRESS_KEY.clone()),
            Predicate::one_of(
                names::INDIVIDUALS_ONLY,
                OwnerField::EntityType,
                &[EntityType::Individual.label()],
            ),
            Predicate::category(names::ENTITY_TYPES, OwnerField::EntityType),
            Predicate::exact(names::SELECTED_SECTION, OwnerField::LegalDescription),
        ]
    }

    fn default_filters() -> FilterState {
        // Unknown-address owners cannot be mailed, so they start hidden.
        FilterState::new()
            .with_flag(names::HIDE_FLAGGED, false)
            .with_flag(names::HIDE_UNKNOWN_ADDRESS, true)
            .with_flag(names::INDIVIDUALS_ONLY, false)
            .with_choice(names::SELECTED_SECTION, None)
    }

    fn columns() -> ColumnConfig {
        ColumnConfig::new()
            .pinned("full_name", "Owner")
            .hidden("first_name", "First Name")
            .hidden("last_name", "Last Name")
            .shown("entity_type", "Type")
            .shown("address", "Address")
            .hidden("address_line_2", "Address 2")
            .shown("city", "City")
            .shown("state", "State")
            .shown("zip_code", "ZIP")
            .shown("legal_description", "Legal Description")
            .hidden("notes", "Notes")
    }
}

fn borrowed(s: &Option<String>) -> Option<Cow<'_, str>> {
    s.as_deref().map(Cow::Borrowed)
}
