//! Operator review of fetched suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocketError, Result};
use crate::job::JobId;

use super::suggestion::Suggestion;

/// Review status of one suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Not yet reviewed.
    Pending,
    /// Will be merged.
    Accepted,
    /// Will not be merged.
    Rejected,
}

impl ReviewStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Accepted => "Accepted",
            ReviewStatus::Rejected => "Rejected",
        }
    }

    /// Check if this is a terminal decision (not pending).
    pub fn is_decided(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

/// A suggestion together with its review status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub suggestion: Suggestion,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

/// Counts of suggestions by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl ReviewCounts {
    pub fn total(&self) -> usize {
        self.pending + self.accepted + self.rejected
    }
}

/// Suggestions fetched for one job, awaiting operator decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionReview {
    job_id: JobId,
    items: Vec<ReviewItem>,
}

impl SuggestionReview {
    /// Start a review with every suggestion pending.
    pub fn new(job_id: JobId, suggestions: Vec<Suggestion>) -> Self {
        let items = suggestions
            .into_iter()
            .map(|suggestion| ReviewItem {
                suggestion,
                status: ReviewStatus::Pending,
                decided_at: None,
            })
            .collect();
        Self { job_id, items }
    }

    /// The job these suggestions were fetched for.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Accept one suggestion. Decisions can be changed until applied.
    pub fn accept(&mut self, index: usize) -> Result<()> {
        self.decide(index, ReviewStatus::Accepted)
    }

    /// Reject one suggestion.
    pub fn reject(&mut self, index: usize) -> Result<()> {
        self.decide(index, ReviewStatus::Rejected)
    }

    /// Accept every pending suggestion.
    pub fn accept_all(&mut self) {
        self.decide_pending(ReviewStatus::Accepted);
    }

    /// Reject every pending suggestion.
    pub fn reject_all(&mut self) {
        self.decide_pending(ReviewStatus::Rejected);
    }

    /// Accepted suggestions, in fetch order.
    pub fn accepted(&self) -> Vec<Suggestion> {
        self.items
            .iter()
            .filter(|i| i.status == ReviewStatus::Accepted)
            .map(|i| i.suggestion.clone())
            .collect()
    }

    pub fn counts(&self) -> ReviewCounts {
        let mut counts = ReviewCounts::default();
        for item in &self.items {
            match item.status {
                ReviewStatus::Pending => counts.pending += 1,
                ReviewStatus::Accepted => counts.accepted += 1,
                ReviewStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }

    /// Whether every suggestion has a decision.
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|i| i.status.is_decided())
    }

    fn decide(&mut self, index: usize, status: ReviewStatus) -> Result<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(DocketError::IndexOutOfRange { index, len })?;
        item.status = status;
        item.decided_at = Some(Utc::now());
        Ok(())
    }

    fn decide_pending(&mut self, status: ReviewStatus) {
        let now = Utc::now();
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.status == ReviewStatus::Pending)
        {
            item.status = status;
            item.decided_at = Some(now);
        }
    }
}
