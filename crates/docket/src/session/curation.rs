//! The curation session state machine.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::entry::Record;
use crate::error::{DocketError, Result};
use crate::filter::{FilterEngine, FilterState, VisibleCache};
use crate::job::{EntryBatch, Job, JobId, JobStatus, Submission};
use crate::selection::{self, Selection, SelectionState};
use crate::store::{EntryStore, DEFAULT_HISTORY_LIMIT};
use crate::suggestion::{merge, MergeReport, Suggestion, SuggestionReview};

use super::activity::{
    Activity, Completion, HistoryTicket, LoadTicket, Selected, SuggestionTicket,
};

/// Prefix of ids given to jobs that failed before the service assigned one.
pub const LOCAL_JOB_PREFIX: &str = "local-";

/// One job in the session's list, with its entries once loaded.
#[derive(Debug, Clone)]
pub struct JobSlot<R> {
    job: Job,
    store: Option<EntryStore<R>>,
    load_error: Option<String>,
}

impl<R: Record> JobSlot<R> {
    fn new(job: Job) -> Self {
        Self {
            job,
            store: None,
            load_error: None,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    /// Error from the last failed entry load, kept for display.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Whether the job exists only in this session.
    pub fn is_local(&self) -> bool {
        self.job.id.as_str().starts_with(LOCAL_JOB_PREFIX)
    }
}

/// Entry counts for the active job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub flagged: usize,
    pub visible: usize,
    pub exportable: usize,
}

/// Curation state for one operator and one tool.
///
/// Holds the job list, the active job, its filters and exclusions, and any
/// suggestion review in progress. Every change goes through `&mut self`;
/// remote work is split into a `begin_*` call that hands out a ticket and a
/// completion call that applies the response only if the ticket is still
/// current.
#[derive(Debug)]
pub struct CurationSession<R: Record> {
    user: String,
    jobs: Vec<JobSlot<R>>,
    active: Option<JobId>,
    filters: FilterState,
    selection: Selection,
    engine: FilterEngine<R>,
    cache: VisibleCache,
    review: Option<SuggestionReview>,
    activity: Activity,
    undo_limit: usize,
    next_seq: u64,
    pending_load: Option<LoadTicket>,
    pending_history: Option<HistoryTicket>,
    pending_suggestions: Option<SuggestionTicket>,
    local_jobs: u64,
}

impl<R: Record> CurationSession<R> {
    /// Start an empty session for `user`.
    pub fn new(user: impl Into<String>) -> Self {
        let engine = FilterEngine::new();
        Self {
            user: user.into(),
            jobs: Vec::new(),
            active: None,
            filters: engine.defaults().clone(),
            selection: Selection::new(),
            engine,
            cache: VisibleCache::new(),
            review: None,
            activity: Activity::default(),
            undo_limit: DEFAULT_HISTORY_LIMIT,
            next_seq: 0,
            pending_load: None,
            pending_history: None,
            pending_suggestions: None,
            local_jobs: 0,
        }
    }

    /// Set how many edits per job can be undone.
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn jobs(&self) -> &[JobSlot<R>] {
        &self.jobs
    }

    pub fn job(&self, id: &JobId) -> Option<&JobSlot<R>> {
        self.jobs.iter().find(|s| &s.job.id == id)
    }

    pub fn active_id(&self) -> Option<&JobId> {
        self.active.as_ref()
    }

    pub fn active_job(&self) -> Option<&Job> {
        self.active.as_ref().and_then(|id| self.job(id)).map(|s| &s.job)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn engine(&self) -> &FilterEngine<R> {
        &self.engine
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn slot_mut(&mut self, id: &JobId) -> Option<&mut JobSlot<R>> {
        self.jobs.iter_mut().find(|s| &s.job.id == id)
    }

    fn active_store(&self) -> Result<&EntryStore<R>> {
        let id = self.active.as_ref().ok_or(DocketError::NoActiveJob)?;
        let slot = self
            .job(id)
            .ok_or_else(|| DocketError::UnknownJob(id.clone()))?;
        slot.store
            .as_ref()
            .ok_or_else(|| DocketError::EntriesNotLoaded(id.clone()))
    }

    fn active_store_mut(&mut self) -> Result<&mut EntryStore<R>> {
        let id = self.active.clone().ok_or(DocketError::NoActiveJob)?;
        let slot = self
            .slot_mut(&id)
            .ok_or_else(|| DocketError::UnknownJob(id.clone()))?;
        slot.store
            .as_mut()
            .ok_or(DocketError::EntriesNotLoaded(id))
    }

    // ------------------------------------------------------------------
    // Job list
    // ------------------------------------------------------------------

    /// Mark a history fetch as in flight.
    pub fn begin_history_refresh(&mut self) -> HistoryTicket {
        let ticket = HistoryTicket {
            seq: self.next_seq(),
        };
        self.pending_history = Some(ticket.clone());
        self.activity.fetching_history = true;
        ticket
    }

    /// Replace the job list with fetched history.
    ///
    /// Loaded entries of jobs still listed are kept. Jobs that only exist in
    /// this session (local failures, or the active job when the service
    /// does not list it yet) stay at the top of the list.
    pub fn finish_history_refresh(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<Job>>,
    ) -> Result<Completion> {
        if self.pending_history.as_ref() != Some(&ticket) {
            warn!("Discarding stale job history");
            return Ok(Completion::Stale);
        }
        self.pending_history = None;
        self.activity.fetching_history = false;

        let fetched = result?;
        let listed: HashSet<JobId> = fetched.iter().map(|j| j.id.clone()).collect();

        let previous = std::mem::take(&mut self.jobs);
        let (session_only, still_listed): (Vec<_>, Vec<_>) = previous
            .into_iter()
            .partition(|slot| !listed.contains(&slot.job.id));

        let active = self.active.as_ref();
        let mut jobs: Vec<JobSlot<R>> = session_only
            .into_iter()
            .filter(|slot| slot.is_local() || active == Some(&slot.job.id))
            .collect();
        let mut known: HashMap<JobId, JobSlot<R>> = still_listed
            .into_iter()
            .map(|slot| (slot.job.id.clone(), slot))
            .collect();
        let mut seen = HashSet::new();

        for job in fetched {
            if !seen.insert(job.id.clone()) {
                continue;
            }
            jobs.push(match known.remove(&job.id) {
                Some(mut slot) => {
                    let (total, flagged) = (slot.job.total_count, slot.job.flagged_count);
                    slot.job = job;
                    slot.job.total_count = slot.job.total_count.or(total);
                    slot.job.flagged_count = slot.job.flagged_count.or(flagged);
                    slot
                }
                None => JobSlot::new(job),
            });
        }
        self.jobs = jobs;

        debug!(count = self.jobs.len(), "Refreshed job history");
        Ok(Completion::Applied)
    }

    /// Activate a job.
    ///
    /// Switching to a different job resets filters to the tool defaults,
    /// clears exclusions and drops any suggestion review. Entries already
    /// loaded are reused; otherwise a load ticket is returned.
    pub fn select(&mut self, id: &JobId) -> Result<Selected> {
        if self.job(id).is_none() {
            return Err(DocketError::UnknownJob(id.clone()));
        }

        if self.active.as_ref() != Some(id) {
            debug!(job = %id, "Switching active job");
            self.active = Some(id.clone());
            self.reset_job_scope();
        }

        let in_flight = self
            .pending_load
            .as_ref()
            .is_some_and(|t| &t.job_id == id);
        let slot = self.job(id).ok_or_else(|| DocketError::UnknownJob(id.clone()))?;
        if slot.is_loaded() {
            return Ok(Selected::Ready);
        }
        if slot.job.status != JobStatus::Succeeded {
            return Ok(Selected::Unavailable);
        }
        if in_flight {
            return Ok(Selected::Loading);
        }

        let ticket = LoadTicket {
            job_id: id.clone(),
            seq: self.next_seq(),
        };
        if let Some(slot) = self.slot_mut(id) {
            slot.load_error = None;
        }
        self.pending_load = Some(ticket.clone());
        self.activity.loading_entries = true;
        Ok(Selected::Load(ticket))
    }

    /// Attach fetched entries to a job.
    ///
    /// A response whose ticket is no longer current is dropped. On failure
    /// the job stays metadata-only and keeps the error for display; select
    /// it again to retry.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<EntryBatch<R>>,
    ) -> Result<Completion> {
        if self.pending_load.as_ref() != Some(&ticket) {
            warn!(job = %ticket.job_id, "Discarding stale entry load");
            return Ok(Completion::Stale);
        }
        self.pending_load = None;
        self.activity.loading_entries = false;
        if self.active.as_ref() != Some(&ticket.job_id) {
            warn!(job = %ticket.job_id, "Discarding entry load for inactive job");
            return Ok(Completion::Stale);
        }

        let undo_limit = self.undo_limit;
        let slot = match self.slot_mut(&ticket.job_id) {
            Some(slot) => slot,
            None => return Ok(Completion::Stale),
        };

        let loaded = result.and_then(|batch| {
            let store = EntryStore::new(batch.entries)?.with_history_limit(undo_limit);
            Ok((store, batch.total_count, batch.flagged_count))
        });
        match loaded {
            Ok((store, total, flagged)) => {
                debug!(job = %ticket.job_id, entries = store.len(), "Loaded entries");
                slot.job.total_count = Some(total);
                slot.job.flagged_count = Some(flagged);
                slot.store = Some(store);
                slot.load_error = None;
                self.cache.clear();
                Ok(Completion::Applied)
            }
            Err(e) => {
                warn!(job = %ticket.job_id, error = %e, "Entry load failed");
                slot.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Remove a job from the session list and return it.
    ///
    /// If it was active, the active pointer is cleared.
    pub fn delete(&mut self, id: &JobId) -> Result<Job> {
        let position = self
            .jobs
            .iter()
            .position(|s| &s.job.id == id)
            .ok_or_else(|| DocketError::UnknownJob(id.clone()))?;
        let slot = self.jobs.remove(position);

        if self.pending_load.as_ref().is_some_and(|t| &t.job_id == id) {
            self.pending_load = None;
            self.activity.loading_entries = false;
        }
        if self.active.as_ref() == Some(id) {
            self.active = None;
            self.reset_job_scope();
        }
        debug!(job = %id, "Removed job from session");
        Ok(slot.job)
    }

    fn reset_job_scope(&mut self) {
        let load_for_other_job = self
            .pending_load
            .as_ref()
            .is_some_and(|t| self.active.as_ref() != Some(&t.job_id));
        if load_for_other_job {
            self.pending_load = None;
            self.activity.loading_entries = false;
        }
        self.filters = self.engine.defaults().clone();
        self.selection.clear();
        self.review = None;
        self.pending_suggestions = None;
        self.activity.fetching_suggestions = false;
        self.cache.clear();
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Mark an upload as in flight.
    pub fn begin_submit(&mut self) {
        self.activity.submitting = true;
    }

    /// Record the outcome of an upload and return the job's id.
    ///
    /// A completed submission becomes the active job with its entries
    /// attached. A processing or transport failure is recorded as a failed
    /// job carrying the error message.
    pub fn record_submission(
        &mut self,
        filename: &str,
        result: Result<Submission<R>>,
    ) -> JobId {
        self.activity.submitting = false;

        let error = match result {
            Ok(Submission::Completed { mut job, batch }) => {
                let id = job.id.clone();
                job.total_count = Some(batch.total_count);
                job.flagged_count = Some(batch.flagged_count);
                let mut slot = JobSlot::new(job);
                match EntryStore::new(batch.entries) {
                    Ok(store) => slot.store = Some(store.with_history_limit(self.undo_limit)),
                    Err(e) => {
                        warn!(job = %id, error = %e, "Submitted job has unusable entries");
                        slot.load_error = Some(e.to_string());
                    }
                }
                self.jobs.retain(|s| s.job.id != id);
                self.jobs.insert(0, slot);
                info!(job = %id, filename, "Submission completed");

                self.active = Some(id.clone());
                self.reset_job_scope();
                return id;
            }
            Ok(Submission::Failed { error }) => error,
            Err(e) => e.to_string(),
        };

        self.local_jobs += 1;
        let id = JobId::new(format!("{}{}", LOCAL_JOB_PREFIX, self.local_jobs));
        warn!(job = %id, filename, %error, "Submission failed");
        let job = Job::new(id.clone(), R::TOOL, filename, self.user.clone()).failed(error);
        self.jobs.insert(0, JobSlot::new(job));
        id
    }

    // ------------------------------------------------------------------
    // Filters and selection
    // ------------------------------------------------------------------

    pub fn set_flag(&mut self, name: &str, on: bool) {
        self.filters.set_flag(name, on);
    }

    pub fn set_choice(&mut self, name: &str, choice: Option<String>) {
        self.filters.set_choice(name, choice);
    }

    pub fn toggle_category(&mut self, name: &str, value: &str) {
        self.filters.toggle_category(name, value);
    }

    /// Replace every filter value.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Restore the tool's default filters and clear every exclusion.
    pub fn reset_filters(&mut self) {
        self.filters = self.engine.defaults().clone();
        self.selection.clear();
        debug!("Reset filters");
    }

    /// Positions of the visible entries, memoized on the store revision and
    /// the filter state.
    pub fn visible_indices(&mut self) -> Result<Arc<[usize]>> {
        let id = self.active.clone().ok_or(DocketError::NoActiveJob)?;
        let slot = self
            .jobs
            .iter()
            .find(|s| s.job.id == id)
            .ok_or_else(|| DocketError::UnknownJob(id.clone()))?;
        let store = slot
            .store
            .as_ref()
            .ok_or_else(|| DocketError::EntriesNotLoaded(id.clone()))?;

        let engine = &self.engine;
        let filters = &self.filters;
        Ok(self.cache.refresh(&id, store.revision(), filters, || {
            engine.visible_indices(store.entries(), filters)
        }))
    }

    /// Entries passing the current filters, in entry order.
    pub fn visible(&mut self) -> Result<Vec<&R>> {
        let indices = self.visible_indices()?;
        let entries = self.active_store()?.entries();
        Ok(indices.iter().map(|&i| &entries[i]).collect())
    }

    /// Keys of the visible entries.
    pub fn visible_keys(&mut self) -> Result<Vec<String>> {
        Ok(self
            .visible()?
            .into_iter()
            .map(|e| e.key().to_string())
            .collect())
    }

    /// Visible entries not excluded from export.
    pub fn exportable(&mut self) -> Result<Vec<&R>> {
        let indices = self.visible_indices()?;
        let entries = self.active_store()?.entries();
        let visible: Vec<&R> = indices.iter().map(|&i| &entries[i]).collect();
        Ok(selection::exportable(&visible, &self.selection))
    }

    /// Include or exclude one entry.
    pub fn toggle(&mut self, key: &str) {
        self.selection.toggle(key);
    }

    /// Flip the whole visible set between included and excluded.
    pub fn toggle_all(&mut self) -> Result<SelectionState> {
        let keys = self.visible_keys()?;
        self.selection.toggle_all(&keys);
        Ok(self.selection.state(&keys))
    }

    /// Tri-state indicator for the visible set.
    pub fn selection_state(&mut self) -> Result<SelectionState> {
        let keys = self.visible_keys()?;
        Ok(self.selection.state(&keys))
    }

    /// Distinct values of a field across the active job's entries.
    pub fn distinct_values(&self, field: R::Field) -> Result<Vec<String>> {
        let store = self.active_store()?;
        Ok(self.engine.distinct_values(store.entries(), field))
    }

    /// Counts for the active job.
    pub fn summary(&mut self) -> Result<SessionSummary> {
        let exportable = self.exportable()?.len();
        let visible = self.visible_indices()?.len();
        let store = self.active_store()?;
        Ok(SessionSummary {
            total: store.len(),
            flagged: store.flagged_count(),
            visible,
            exportable,
        })
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// All entries of the active job, unfiltered.
    pub fn entries(&self) -> Result<&[R]> {
        Ok(self.active_store()?.entries())
    }

    /// Shared snapshot of the active job's entries.
    pub fn snapshot(&self) -> Result<Arc<Vec<R>>> {
        Ok(self.active_store()?.snapshot())
    }

    /// Revision of the active job's entries.
    pub fn revision(&self) -> Result<u64> {
        Ok(self.active_store()?.revision())
    }

    /// Manually correct one field of one entry.
    pub fn edit(&mut self, index: usize, field: &str, value: &Value) -> Result<()> {
        self.active_store_mut()?.edit(index, field, value)
    }

    /// Undo the last edit or merge on the active job.
    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.active_store_mut()?.undo())
    }

    // ------------------------------------------------------------------
    // Suggestions
    // ------------------------------------------------------------------

    /// Mark a suggestion request as in flight and return the entries to
    /// send with it.
    pub fn begin_suggestions(&mut self) -> Result<(SuggestionTicket, Arc<Vec<R>>)> {
        let snapshot = self.snapshot()?;
        let job_id = self.active.clone().ok_or(DocketError::NoActiveJob)?;
        let ticket = SuggestionTicket {
            job_id,
            seq: self.next_seq(),
        };
        self.pending_suggestions = Some(ticket.clone());
        self.activity.fetching_suggestions = true;
        Ok((ticket, snapshot))
    }

    /// Open a review with fetched suggestions.
    ///
    /// Responses for a job that is no longer active are dropped.
    pub fn complete_suggestions(
        &mut self,
        ticket: SuggestionTicket,
        result: Result<Vec<Suggestion>>,
    ) -> Result<Completion> {
        if self.pending_suggestions.as_ref() != Some(&ticket)
            || self.active.as_ref() != Some(&ticket.job_id)
        {
            warn!(job = %ticket.job_id, "Discarding stale suggestions");
            return Ok(Completion::Stale);
        }
        self.pending_suggestions = None;
        self.activity.fetching_suggestions = false;

        let suggestions = result?;
        debug!(job = %ticket.job_id, count = suggestions.len(), "Received suggestions");
        self.review = Some(SuggestionReview::new(ticket.job_id, suggestions));
        Ok(Completion::Applied)
    }

    pub fn review(&self) -> Option<&SuggestionReview> {
        self.review.as_ref()
    }

    pub fn review_mut(&mut self) -> Option<&mut SuggestionReview> {
        self.review.as_mut()
    }

    /// Merge the accepted suggestions of the open review and close it.
    pub fn apply_accepted(&mut self) -> Result<MergeReport> {
        let review = self
            .review
            .as_ref()
            .ok_or_else(|| DocketError::Validation("No suggestion review is open".to_string()))?;
        let accepted = review.accepted();
        let report = self.apply_suggestions(&accepted)?;
        self.review = None;
        Ok(report)
    }

    /// Merge suggestions into the active job's entries as one transition.
    pub fn apply_suggestions(&mut self, suggestions: &[Suggestion]) -> Result<MergeReport> {
        let store = self.active_store_mut()?;
        let (entries, report) = merge(store.entries(), suggestions).split();
        if report.applied > 0 {
            store.replace(entries)?;
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Mark an export as in flight.
    pub fn begin_export(&mut self) {
        self.activity.exporting = true;
    }

    pub fn finish_export(&mut self) {
        self.activity.exporting = false;
    }
}
