//! In-flight indicators and tickets for asynchronous session operations.

use serde::Serialize;

use crate::job::JobId;

/// Which remote operations are currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub fetching_history: bool,
    pub loading_entries: bool,
    pub submitting: bool,
    pub fetching_suggestions: bool,
    pub exporting: bool,
}

impl Activity {
    /// Whether nothing is in flight.
    pub fn is_idle(&self) -> bool {
        *self == Activity::default()
    }
}

/// Issued when an entry load starts; completing with a ticket that is no
/// longer current discards the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub(crate) job_id: JobId,
    pub(crate) seq: u64,
}

impl LoadTicket {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

/// Issued when a history refresh starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub(crate) seq: u64,
}

/// Issued when a suggestion request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTicket {
    pub(crate) job_id: JobId,
    pub(crate) seq: u64,
}

impl SuggestionTicket {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

/// Outcome of selecting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// Entries are loaded and usable.
    Ready,
    /// Entries must be fetched; complete the load with this ticket.
    Load(LoadTicket),
    /// A load for this job is already in flight.
    Loading,
    /// The job has no entries to load (pending or failed).
    Unavailable,
}

/// Whether an asynchronous response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response no longer matched the session and was dropped.
    Stale,
}
