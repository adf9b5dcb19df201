//! Local CSV rendering.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DocketError, Result};
use crate::service::RenderService;

use super::format::{ExportFormat, RenderRequest};

/// Renders delimited exports in-process, one row per entry and one column
/// per header.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a request synchronously.
    pub fn render_csv(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        if request.format != ExportFormat::Csv {
            return Err(DocketError::ExportFailed(format!(
                "{} rendering is not available locally",
                request.format.label()
            )));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(request.columns.iter().map(|c| c.label.as_str()))?;
        for entry in &request.entries {
            writer.write_record(request.columns.iter().map(|c| cell(entry.get(&c.key))))?;
        }
        writer
            .into_inner()
            .map_err(|e| DocketError::ExportFailed(e.to_string()))
    }
}

#[async_trait]
impl RenderService for CsvRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        self.render_csv(request)
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
