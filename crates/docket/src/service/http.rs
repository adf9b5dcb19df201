//! HTTP/JSON implementation of the collaborator traits.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DocketConfig;
use crate::entry::{Record, ToolKind};
use crate::error::{DocketError, Result};
use crate::export::RenderRequest;
use crate::job::{EntryBatch, Job, JobId, Submission, Upload};
use crate::suggestion::Suggestion;

use super::{ExtractionService, JobHistory, RenderService, SuggestionService};

/// Client for the job, extraction, suggestion and rendering endpoints.
///
/// Endpoints, relative to the base URL:
///
/// - `GET /jobs?tool=&limit=` - job history
/// - `GET /jobs/{id}/entries` - entries of one job
/// - `DELETE /jobs/{id}` - remove a job
/// - `POST /jobs?tool=&filename=` - submit a file (raw body)
/// - `POST /suggestions/{tool}` - suggestions for entries
/// - `POST /export` - render a file
#[derive(Debug, Clone)]
pub struct HttpServices {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum SubmitResponse<R> {
    Succeeded {
        job: Job,
        entries: Vec<R>,
        #[serde(default)]
        total_count: Option<usize>,
        #[serde(default)]
        flagged_count: Option<usize>,
    },
    Failed {
        error: String,
    },
}

#[derive(Serialize)]
struct SuggestionRequest<'a, R> {
    entries: &'a [R],
}

#[derive(Deserialize)]
struct SuggestionResponse {
    suggestions: Vec<Suggestion>,
}

impl HttpServices {
    /// Create a client for the configured service URL.
    pub fn new(config: &DocketConfig) -> Result<Self> {
        let url = config.require_service_url()?;
        let base_url = Url::parse(url)
            .map_err(|e| DocketError::Config(format!("Invalid service URL '{}': {}", url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DocketError::Config(format!(
                "Service URL '{}' cannot be used as a base",
                url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DocketError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create from `DOCKET_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&DocketConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turn a non-success status into a service error.
    async fn check(operation: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body.trim())
        };
        Err(DocketError::service(operation, message))
    }
}

#[async_trait]
impl<R: Record> JobHistory<R> for HttpServices {
    async fn list_jobs(&self, tool: ToolKind, limit: usize) -> Result<Vec<Job>> {
        let response = self
            .client
            .get(self.url(&["jobs"]))
            .query(&[("tool", tool.slug().to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let jobs: Vec<Job> = Self::check("list jobs", response).await?.json().await?;
        debug!(%tool, count = jobs.len(), "Fetched job history");
        Ok(jobs)
    }

    async fn entries(&self, job_id: &JobId) -> Result<EntryBatch<R>> {
        let response = self
            .client
            .get(self.url(&["jobs", job_id.as_str(), "entries"]))
            .send()
            .await?;
        Ok(Self::check("load entries", response).await?.json().await?)
    }

    async fn delete_job(&self, job_id: &JobId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&["jobs", job_id.as_str()]))
            .send()
            .await?;
        Self::check("delete job", response).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: Record> ExtractionService<R> for HttpServices {
    async fn submit(&self, tool: ToolKind, upload: &Upload) -> Result<Submission<R>> {
        let response = self
            .client
            .post(self.url(&["jobs"]))
            .query(&[("tool", tool.slug()), ("filename", upload.filename.as_str())])
            .body(upload.bytes.clone())
            .send()
            .await?;
        let response: SubmitResponse<R> = Self::check("submit", response).await?.json().await?;

        Ok(match response {
            SubmitResponse::Succeeded {
                job,
                entries,
                total_count,
                flagged_count,
            } => {
                let mut batch = EntryBatch::new(entries);
                if let Some(total) = total_count {
                    batch.total_count = total;
                }
                if let Some(flagged) = flagged_count {
                    batch.flagged_count = flagged;
                }
                Submission::Completed { job, batch }
            }
            SubmitResponse::Failed { error } => Submission::Failed { error },
        })
    }
}

#[async_trait]
impl<R: Record> SuggestionService<R> for HttpServices {
    async fn suggestions(&self, tool: ToolKind, entries: &[R]) -> Result<Vec<Suggestion>> {
        let response = self
            .client
            .post(self.url(&["suggestions", tool.slug()]))
            .json(&SuggestionRequest { entries })
            .send()
            .await?;
        let response: SuggestionResponse =
            Self::check("suggestions", response).await?.json().await?;
        Ok(response.suggestions)
    }
}

#[async_trait]
impl RenderService for HttpServices {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.url(&["export"]))
            .json(request)
            .send()
            .await?;
        let bytes = Self::check("export", response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
