//! Export formats and the render request sent to the rendering service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::columns::Column;
use crate::entry::ToolKind;

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Delimited text.
    Csv,
    /// Spreadsheet.
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

/// Header of one exported column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub key: String,
    pub label: String,
}

impl From<&Column> for ColumnHeader {
    fn from(column: &Column) -> Self {
        Self {
            key: column.key.clone(),
            label: column.label.clone(),
        }
    }
}

/// Wire request for the rendering service.
///
/// Carries the exportable entries themselves, never indices or filter
/// descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub tool: ToolKind,
    pub format: ExportFormat,
    /// Final file name, extension included.
    pub filename: String,
    pub columns: Vec<ColumnHeader>,
    /// Serialized entries, in exportable order.
    pub entries: Vec<Value>,
}

/// A rendered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub format: ExportFormat,
    pub entry_count: usize,
    /// `sha256:<hex>` digest of `bytes`.
    pub digest: String,
    pub bytes: Vec<u8>,
}
