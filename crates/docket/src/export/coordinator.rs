//! Export coordination: exportable entries in, rendered file out.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::entry::Record;
use crate::error::{DocketError, Result};
use crate::service::RenderService;

use super::format::{ColumnHeader, ExportFormat, ExportedFile, RenderRequest};

/// Name used when the operator gives no usable filename.
pub const DEFAULT_FILENAME: &str = "export";

/// Builds render requests and hands them to a [`RenderService`].
#[derive(Clone)]
pub struct ExportCoordinator {
    renderer: Arc<dyn RenderService>,
}

impl ExportCoordinator {
    pub fn new(renderer: Arc<dyn RenderService>) -> Self {
        Self { renderer }
    }

    /// Build the wire request for `entries`.
    ///
    /// Fails with [`DocketError::EmptyExport`] when there is nothing to
    /// export, before anything is sent anywhere.
    pub fn prepare<R: Record>(
        &self,
        entries: &[&R],
        format: ExportFormat,
        filename_hint: &str,
    ) -> Result<RenderRequest> {
        if entries.is_empty() {
            return Err(DocketError::EmptyExport);
        }

        let columns = R::columns()
            .columns()
            .iter()
            .map(ColumnHeader::from)
            .collect();
        let entries = entries
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(RenderRequest {
            tool: R::TOOL,
            format,
            filename: export_filename(filename_hint, format),
            columns,
            entries,
        })
    }

    /// Send a prepared request to the renderer.
    ///
    /// Any renderer failure, or an empty response, is reported as
    /// [`DocketError::ExportFailed`]; no partial file is returned.
    pub async fn send(&self, request: RenderRequest) -> Result<ExportedFile> {
        let bytes = match self.renderer.render(&request).await {
            Ok(bytes) if bytes.is_empty() => {
                return Err(DocketError::ExportFailed(
                    "renderer returned an empty file".to_string(),
                ));
            }
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(filename = %request.filename, error = %e, "Export failed");
                return Err(match e {
                    DocketError::ExportFailed(message) => DocketError::ExportFailed(message),
                    other => DocketError::ExportFailed(other.to_string()),
                });
            }
        };

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = format!("sha256:{:x}", hasher.finalize());

        info!(
            tool = %request.tool,
            filename = %request.filename,
            entries = request.entries.len(),
            %digest,
            "Exported entries"
        );

        Ok(ExportedFile {
            filename: request.filename,
            format: request.format,
            entry_count: request.entries.len(),
            digest,
            bytes,
        })
    }

    /// Prepare and send in one step.
    pub async fn export<R: Record>(
        &self,
        entries: &[&R],
        format: ExportFormat,
        filename_hint: &str,
    ) -> Result<ExportedFile> {
        let request = self.prepare(entries, format, filename_hint)?;
        self.send(request).await
    }
}

/// Final file name for a hint: unsafe characters replaced, the format's
/// extension appended unless already present.
pub fn export_filename(hint: &str, format: ExportFormat) -> String {
    let cleaned: String = hint
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = cleaned.trim_matches('.');
    let stem = if stem.is_empty() { DEFAULT_FILENAME } else { stem };

    let extension = format.extension();
    let has_extension = stem
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension));
    if has_extension {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}
