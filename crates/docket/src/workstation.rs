//! Workstation: a curation session wired to its collaborators.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::columns::{Column, ColumnPreferences, JsonFilePreferences, PreferenceStore};
use crate::config::DocketConfig;
use crate::entry::Record;
use crate::error::Result;
use crate::export::{ExportCoordinator, ExportFormat, ExportedFile};
use crate::job::{JobId, Upload};
use crate::service::{
    ExtractionService, HttpServices, JobHistory, RenderService, SuggestionService,
};
use crate::session::{Completion, CurationSession, Selected};
use crate::suggestion::MergeReport;

/// The collaborators a workstation talks to.
pub struct Services<R: Record> {
    pub history: Arc<dyn JobHistory<R>>,
    pub extraction: Arc<dyn ExtractionService<R>>,
    pub suggestions: Arc<dyn SuggestionService<R>>,
    pub renderer: Arc<dyn RenderService>,
    pub preferences: Arc<dyn PreferenceStore>,
}

impl<R: Record> Clone for Services<R> {
    fn clone(&self) -> Self {
        Self {
            history: Arc::clone(&self.history),
            extraction: Arc::clone(&self.extraction),
            suggestions: Arc::clone(&self.suggestions),
            renderer: Arc::clone(&self.renderer),
            preferences: Arc::clone(&self.preferences),
        }
    }
}

impl<R: Record> Services<R> {
    /// HTTP collaborators at the configured service URL, with column
    /// preferences in the configured JSON file.
    pub fn http(config: &DocketConfig) -> Result<Self> {
        let http = Arc::new(HttpServices::new(config)?);
        Ok(Self {
            history: http.clone(),
            extraction: http.clone(),
            suggestions: http.clone(),
            renderer: http,
            preferences: Arc::new(JsonFilePreferences::new(&config.preferences_path)),
        })
    }
}

/// Runs each operator action end to end against the session and its
/// collaborators.
pub struct Workstation<R: Record> {
    session: CurationSession<R>,
    services: Services<R>,
    exporter: ExportCoordinator,
    columns: ColumnPreferences,
    history_limit: usize,
}

impl<R: Record> Workstation<R> {
    pub fn new(user: impl Into<String>, services: Services<R>) -> Self {
        let exporter = ExportCoordinator::new(Arc::clone(&services.renderer));
        let columns =
            ColumnPreferences::new(Arc::clone(&services.preferences), R::TOOL, R::columns());
        Self {
            session: CurationSession::new(user),
            services,
            exporter,
            columns,
            history_limit: DocketConfig::default().history_limit,
        }
    }

    /// Create a workstation using HTTP collaborators from `config`.
    pub fn from_config(user: impl Into<String>, config: &DocketConfig) -> Result<Self> {
        Ok(Self::new(user, Services::http(config)?).with_history_limit(config.history_limit))
    }

    /// Set how many jobs a history refresh asks for.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn session(&self) -> &CurationSession<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CurationSession<R> {
        &mut self.session
    }

    /// Reload the job list from history.
    pub async fn refresh_history(&mut self) -> Result<Completion> {
        let ticket = self.session.begin_history_refresh();
        let result = self
            .services
            .history
            .list_jobs(R::TOOL, self.history_limit)
            .await;
        self.session.finish_history_refresh(ticket, result)
    }

    /// Make a job active, fetching its entries if they are not loaded yet.
    pub async fn select_job(&mut self, id: &JobId) -> Result<Selected> {
        let selected = self.session.select(id)?;
        if let Selected::Load(ticket) = &selected {
            let result = self.services.history.entries(ticket.job_id()).await;
            self.session.complete_load(ticket.clone(), result)?;
        }
        Ok(selected)
    }

    /// Upload a file for extraction and record the resulting job.
    pub async fn submit(&mut self, upload: Upload) -> JobId {
        self.session.begin_submit();
        let result = self.services.extraction.submit(R::TOOL, &upload).await;
        self.session.record_submission(&upload.filename, result)
    }

    /// Remove a job from the session and, best effort, from history.
    ///
    /// A failed remote delete is logged; the job stays removed locally.
    pub async fn delete_job(&mut self, id: &JobId) -> Result<()> {
        let slot_is_local = self.session.job(id).is_some_and(|s| s.is_local());
        let job = self.session.delete(id)?;
        if slot_is_local {
            return Ok(());
        }
        if let Err(e) = self.services.history.delete_job(&job.id).await {
            warn!(job = %job.id, error = %e, "Remote delete failed");
        }
        Ok(())
    }

    /// Request suggestions for the active job's entries and open a review.
    pub async fn fetch_suggestions(&mut self) -> Result<Completion> {
        let (ticket, entries) = self.session.begin_suggestions()?;
        let result = self
            .services
            .suggestions
            .suggestions(R::TOOL, &entries)
            .await;
        self.session.complete_suggestions(ticket, result)
    }

    /// Merge the accepted suggestions of the open review.
    pub fn apply_accepted(&mut self) -> Result<MergeReport> {
        self.session.apply_accepted()
    }

    /// Export the exportable set.
    pub async fn export(
        &mut self,
        format: ExportFormat,
        filename_hint: &str,
    ) -> Result<ExportedFile> {
        let request = {
            let entries = self.session.exportable()?;
            self.exporter.prepare(&entries, format, filename_hint)?
        };
        self.session.begin_export();
        let result = self.exporter.send(request).await;
        self.session.finish_export();
        result
    }

    /// Columns to render for the session's user.
    pub fn visible_columns(&self) -> Vec<Column> {
        self.columns.visible_columns(self.session.user())
    }

    /// Toggleable columns currently visible for the session's user.
    pub fn visible_column_keys(&self) -> BTreeSet<String> {
        self.columns.get_visible(self.session.user())
    }

    /// Show or hide one column for the session's user.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<BTreeSet<String>> {
        debug!(key, visible, "Toggling column");
        self.columns.set_column(self.session.user(), key, visible)
    }
}
