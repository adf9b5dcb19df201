//! External collaborators of a curation session.
//!
//! The session never reaches the network itself. Job history, extraction,
//! suggestions and rendering sit behind these traits; [`HttpServices`]
//! implements all four over HTTP/JSON.

mod http;

use async_trait::async_trait;

use crate::entry::{Record, ToolKind};
use crate::error::Result;
use crate::export::RenderRequest;
use crate::job::{EntryBatch, Job, JobId, Submission, Upload};
use crate::suggestion::Suggestion;

pub use http::HttpServices;

/// Previously submitted jobs and their entries.
#[async_trait]
pub trait JobHistory<R: Record>: Send + Sync {
    /// Most recent jobs of a tool, newest first.
    async fn list_jobs(&self, tool: ToolKind, limit: usize) -> Result<Vec<Job>>;

    /// Entries of a succeeded job, with authoritative counts.
    async fn entries(&self, job_id: &JobId) -> Result<EntryBatch<R>>;

    /// Remove a job from durable history.
    async fn delete_job(&self, job_id: &JobId) -> Result<()>;
}

/// Turns an uploaded file into a job with entries.
#[async_trait]
pub trait ExtractionService<R: Record>: Send + Sync {
    async fn submit(&self, tool: ToolKind, upload: &Upload) -> Result<Submission<R>>;
}

/// Proposes field corrections for a job's entries.
#[async_trait]
pub trait SuggestionService<R: Record>: Send + Sync {
    async fn suggestions(&self, tool: ToolKind, entries: &[R]) -> Result<Vec<Suggestion>>;
}

/// Renders an export request into file bytes.
#[async_trait]
pub trait RenderService: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>>;
}
