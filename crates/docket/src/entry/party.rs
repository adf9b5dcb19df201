//! Party records from the extraction tool.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::ColumnConfig;
use crate::error::FieldError;
use crate::filter::{names, FilterState, Predicate};

use super::{value, EntityType, Record, ToolKind};

schema_fields! {
    /// Editable fields of a [`Party`].
    pub enum PartyField {
        PrimaryName => "primary_name",
        EntityType => "entity_type",
        MailingAddress => "mailing_address",
        MailingAddress2 => "mailing_address_2",
        City => "city",
        State => "state",
        ZipCode => "zip_code",
        Notes => "notes",
        Flagged => "flagged",
        FlagReason => "flag_reason",
    }
}

/// A party named on a conveyance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Entry number assigned by extraction; the entry key.
    pub entry_number: String,

    pub primary_name: String,

    #[serde(default)]
    pub entity_type: EntityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_address_2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub flagged: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

impl Party {
    /// Create an unflagged party of unknown type.
    pub fn new(entry_number: impl Into<String>, primary_name: impl Into<String>) -> Self {
        Self {
            entry_number: entry_number.into(),
            primary_name: primary_name.into(),
            entity_type: EntityType::Unknown,
            mailing_address: None,
            mailing_address_2: None,
            city: None,
            state: None,
            zip_code: None,
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

    /// Set the mailing address lines.
    pub fn with_address(
        mut self,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        self.mailing_address = Some(street.into());
        self.city = Some(city.into());
        self.state = Some(state.into());
        self.zip_code = Some(zip_code.into());
        self
    }

    /// Flag the party for review.
    pub fn flagged(mut self, reason: impl Into<String>) -> Self {
        self.flagged = true;
        self.flag_reason = Some(reason.into());
        self
    }
}

impl Record for Party {
    type Field = PartyField;

    const TOOL: ToolKind = ToolKind::Extract;

    fn key(&self) -> &str {
        &self.entry_number
    }

    fn is_flagged(&self) -> bool {
        self.flagged
    }

    fn flag_reason(&self) -> Option<&str> {
        self.flag_reason.as_deref()
    }

    fn value(&self, field: PartyField) -> Option<Cow<'_, str>> {
        match field {
            PartyField::PrimaryName => Some(Cow::Borrowed(self.primary_name.as_str())),
            PartyField::EntityType => Some(Cow::Borrowed(self.entity_type.label())),
            PartyField::MailingAddress => self.mailing_address.as_deref().map(Cow::Borrowed),
            PartyField::MailingAddress2 => self.mailing_address_2.as_deref().map(Cow::Borrowed),
            PartyField::City => self.city.as_deref().map(Cow::Borrowed),
            PartyField::State => self.state.as_deref().map(Cow::Borrowed),
            PartyField::ZipCode => self.zip_code.as_deref().map(Cow::Borrowed),
            PartyField::Notes => self.notes.as_deref().map(Cow::Borrowed),
            PartyField::Flagged => Some(Cow::Borrowed(if self.flagged { "true" } else { "false" })),
            PartyField::FlagReason => self.flag_reason.as_deref().map(Cow::Borrowed),
        }
    }

    fn set(&mut self, field: PartyField, v: &Value) -> Result<(), FieldError> {
        match field {
            PartyField::PrimaryName => self.primary_name = value::text("primary_name", v)?,
            PartyField::EntityType => self.entity_type = value::entity_type("entity_type", v)?,
            PartyField::MailingAddress => {
                self.mailing_address = value::optional_text("mailing_address", v)?
            }
            PartyField::MailingAddress2 => {
                self.mailing_address_2 = value::optional_text("mailing_address_2", v)?
            }
            PartyField::City => self.city = value::optional_text("city", v)?,
            PartyField::State => self.state = value::optional_text("state", v)?,
            PartyField::ZipCode => self.zip_code = value::optional_text("zip_code", v)?,
            PartyField::Notes => self.notes = value::optional_text("notes", v)?,
            PartyField::Flagged => self.flagged = value::boolean("flagged", v)?,
            PartyField::FlagReason => self.flag_reason = value::optional_text("flag_reason", v)?,
        }
        Ok(())
    }

    fn predicates() -> Vec<Predicate<PartyField>> {
        vec![
            Predicate::one_of(
                names::INDIVIDUALS_ONLY,
                PartyField::EntityType,
                &[EntityType::Individual.label()],
            ),
            Predicate::category(names::ENTITY_TYPES, PartyField::EntityType),
            Predicate::hide_flagged(names::HIDE_FLAGGED),
        ]
    }

    fn default_filters() -> FilterState {
        FilterState::new()
            .with_flag(names::INDIVIDUALS_ONLY, false)
            .with_flag(names::HIDE_FLAGGED, false)
    }

    fn columns() -> ColumnConfig {
        ColumnConfig::new()
            .pinned("entry_number", "#")
            .pinned("primary_name", "Name")
            .shown("entity_type", "Type")
            .shown("mailing_address", "Address")
            .hidden("mailing_address_2", "Address 2")
            .shown("city", "City")
            .shown("state", "State")
            .shown("zip_code", "ZIP")
            .hidden("notes", "Notes")
            .hidden("flag_reason", "Flag Reason")
    }
}
