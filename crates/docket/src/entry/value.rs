//! Conversions from untyped JSON values into typed entry fields.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FieldError;

use super::EntityType;

/// Text field. Numbers and booleans are accepted in their display form.
pub(crate) fn text(field: &'static str, value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(FieldError::InvalidValue {
            field,
            expected: "text",
        }),
    }
}

/// Optional text field. `null` and blank strings clear the field.
pub(crate) fn optional_text(
    field: &'static str,
    value: &Value,
) -> Result<Option<String>, FieldError> {
    if value.is_null() {
        return Ok(None);
    }
    let s = text(field, value)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// Optional number. Numeric strings may carry `$` signs and thousands
/// separators, as they appear on statements.
pub(crate) fn optional_number(
    field: &'static str,
    value: &Value,
) -> Result<Option<f64>, FieldError> {
    let invalid = FieldError::InvalidValue {
        field,
        expected: "number",
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or(invalid),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned.parse::<f64>().map(Some).map_err(|_| invalid)
        }
        _ => Err(invalid),
    }
}

pub(crate) fn boolean(field: &'static str, value: &Value) -> Result<bool, FieldError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(true),
            "false" | "no" | "n" | "0" => Ok(false),
            _ => Err(FieldError::InvalidValue {
                field,
                expected: "boolean",
            }),
        },
        _ => Err(FieldError::InvalidValue {
            field,
            expected: "boolean",
        }),
    }
}

pub(crate) fn entity_type(field: &'static str, value: &Value) -> Result<EntityType, FieldError> {
    value
        .as_str()
        .and_then(EntityType::parse)
        .ok_or(FieldError::InvalidValue {
            field,
            expected: "entity type",
        })
}

/// Optional ISO date (`YYYY-MM-DD`) or US date (`MM/DD/YYYY`).
pub(crate) fn optional_date(
    field: &'static str,
    value: &Value,
) -> Result<Option<NaiveDate>, FieldError> {
    let invalid = FieldError::InvalidValue {
        field,
        expected: "date",
    };
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
                .map(Some)
                .map_err(|_| invalid)
        }
        _ => Err(invalid),
    }
}
