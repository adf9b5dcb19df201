//! Suggested field corrections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A proposed correction to one field of one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Position in the unfiltered entry list as last loaded.
    pub entry_index: usize,

    /// Field wire name in the tool's schema.
    pub field: String,

    /// Replacement value; converted to the field's type on merge.
    pub suggested_value: Value,

    /// Why the service proposed this change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Confidence in this suggestion (0.0-1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(entry_index: usize, field: impl Into<String>, suggested_value: Value) -> Self {
        Self {
            entry_index,
            field: field.into(),
            suggested_value,
            reason: None,
            confidence: None,
        }
    }

    /// Set the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the confidence, clamped to 0.0-1.0.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}
