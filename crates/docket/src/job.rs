//! Jobs and the payloads collaborators exchange about them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{Record, ToolKind};

/// Identifier of a job, assigned by the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Processing status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, not yet processed.
    Pending,
    /// Processing produced entries.
    Succeeded,
    /// Processing failed; see [`Job::error`].
    Failed,
}

impl JobStatus {
    /// Check if processing has finished either way.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Metadata for one submitted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,

    pub tool: ToolKind,

    /// Name of the uploaded file.
    pub source_filename: String,

    pub submitted_by: String,

    pub submitted_at: DateTime<Utc>,

    pub status: JobStatus,

    /// Processing error for failed jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Entry count reported with the entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,

    /// Flagged entry count reported with the entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_count: Option<usize>,
}

impl Job {
    /// Create a pending job submitted now.
    pub fn new(
        id: JobId,
        tool: ToolKind,
        source_filename: impl Into<String>,
        submitted_by: impl Into<String>,
    ) -> Self {
        Self {
            id,
            tool,
            source_filename: source_filename.into(),
            submitted_by: submitted_by.into(),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
            error: None,
            total_count: None,
            flagged_count: None,
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the job failed with an error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self
    }
}

/// Entries for one job together with the service's authoritative counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryBatch<R> {
    pub entries: Vec<R>,
    pub total_count: usize,
    pub flagged_count: usize,
}

impl<R: Record> EntryBatch<R> {
    /// Build a batch, counting totals from the entries themselves.
    pub fn new(entries: Vec<R>) -> Self {
        let flagged_count = entries.iter().filter(|e| e.is_flagged()).count();
        Self {
            total_count: entries.len(),
            flagged_count,
            entries,
        }
    }
}

/// A file handed to the extraction service.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Terminal outcome of submitting one file.
#[derive(Debug, Clone)]
pub enum Submission<R> {
    /// Processing succeeded and returned entries.
    Completed { job: Job, batch: EntryBatch<R> },
    /// Processing failed.
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Party;

    #[test]
    fn test_batch_counts() {
        let batch = EntryBatch::new(vec![
            Party::new("1", "A"),
            Party::new("2", "B").flagged("No address"),
        ]);
        assert_eq!(batch.total_count, 2);
        assert_eq!(batch.flagged_count, 1);
    }

    #[test]
    fn test_job_serialization() {
        let job = Job::new(JobId::new("j1"), ToolKind::Title, "deed.pdf", "ops@example.com")
            .with_status(JobStatus::Succeeded);
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["id"], "j1");
        assert_eq!(json["tool"], "title");
        assert_eq!(json["status"], "succeeded");
        assert!(json.get("error").is_none());

        let parsed: Job = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_terminal_status() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
