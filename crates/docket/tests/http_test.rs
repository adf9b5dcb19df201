//! Integration tests for the HTTP collaborators.

use serde_json::json;
use wiremock::matchers::{body_bytes, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docket::entry::{Party, RevenueLine, ToolKind};
use docket::export::{ColumnHeader, ExportFormat, RenderRequest};
use docket::job::{JobId, JobStatus, Submission, Upload};
use docket::service::{
    ExtractionService, HttpServices, JobHistory, RenderService, SuggestionService,
};
use docket::{DocketConfig, DocketError};

fn services(server: &MockServer) -> HttpServices {
    HttpServices::new(&DocketConfig::new().with_service_url(server.uri())).unwrap()
}

fn job_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "tool": "extract",
        "source_filename": "deed.pdf",
        "submitted_by": "ops@example.com",
        "submitted_at": "2024-05-01T12:00:00Z",
        "status": status
    })
}

// =============================================================================
// Job History
// =============================================================================

#[tokio::test]
async fn test_list_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("tool", "extract"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_json("j2", "succeeded"),
            job_json("j1", "failed")
        ])))
        .mount(&server)
        .await;

    let jobs = JobHistory::<Party>::list_jobs(&services(&server), ToolKind::Extract, 25)
        .await
        .unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, JobId::new("j2"));
    assert_eq!(jobs[1].status, JobStatus::Failed);
}

#[tokio::test]
async fn test_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/j1/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {"entry_number": "1", "primary_name": "Jane Doe", "entity_type": "Individual"},
                {"entry_number": "2", "primary_name": "Doe Trust", "flagged": true}
            ],
            "total_count": 2,
            "flagged_count": 1
        })))
        .mount(&server)
        .await;

    let batch = JobHistory::<Party>::entries(&services(&server), &JobId::new("j1"))
        .await
        .unwrap();

    assert_eq!(batch.entries.len(), 2);
    assert_eq!(batch.flagged_count, 1);
    assert!(batch.entries[1].flagged);
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/missing/entries"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such job"))
        .mount(&server)
        .await;

    let result = JobHistory::<Party>::entries(&services(&server), &JobId::new("missing")).await;

    match result {
        Err(DocketError::Service { operation, message }) => {
            assert_eq!(operation, "load entries");
            assert!(message.contains("404"));
            assert!(message.contains("no such job"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_job() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/jobs/j1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    JobHistory::<Party>::delete_job(&services(&server), &JobId::new("j1"))
        .await
        .unwrap();
}

// =============================================================================
// Extraction and Suggestions
// =============================================================================

#[tokio::test]
async fn test_submit_completed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .and(query_param("tool", "revenue"))
        .and(query_param("filename", "statement.pdf"))
        .and(body_bytes(b"%PDF-1.7".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "job": {
                "id": "r1",
                "tool": "revenue",
                "source_filename": "statement.pdf",
                "submitted_by": "ops@example.com",
                "submitted_at": "2024-05-01T12:00:00Z",
                "status": "succeeded"
            },
            "entries": [
                {"line_number": "1", "property_name": "Smith 1-H", "product": "Oil", "net_value": 120.5}
            ]
        })))
        .mount(&server)
        .await;

    let upload = Upload::new("statement.pdf", b"%PDF-1.7".to_vec());
    let submission =
        ExtractionService::<RevenueLine>::submit(&services(&server), ToolKind::Revenue, &upload)
            .await
            .unwrap();

    match submission {
        Submission::Completed { job, batch } => {
            assert_eq!(job.id, JobId::new("r1"));
            assert_eq!(batch.total_count, 1);
            assert_eq!(batch.entries[0].net_value, Some(120.5));
        }
        Submission::Failed { error } => panic!("unexpected failure: {}", error),
    }
}

#[tokio::test]
async fn test_submit_failed_processing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "failed", "error": "Unreadable PDF"})),
        )
        .mount(&server)
        .await;

    let upload = Upload::new("scan.pdf", vec![0]);
    let submission =
        ExtractionService::<Party>::submit(&services(&server), ToolKind::Extract, &upload)
            .await
            .unwrap();

    assert!(matches!(submission, Submission::Failed { error } if error == "Unreadable PDF"));
}

#[tokio::test]
async fn test_suggestions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/suggestions/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestions": [
                {"entry_index": 0, "field": "entity_type", "suggested_value": "Trust", "confidence": 0.9}
            ]
        })))
        .mount(&server)
        .await;

    let entries = vec![Party::new("1", "Doe Family Trust")];
    let suggestions = SuggestionService::<Party>::suggestions(
        &services(&server),
        ToolKind::Extract,
        &entries,
    )
    .await
    .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].field, "entity_type");
    assert_eq!(suggestions[0].confidence, Some(0.9));
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_render() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
        .mount(&server)
        .await;

    let request = RenderRequest {
        tool: ToolKind::Extract,
        format: ExportFormat::Xlsx,
        filename: "parties.xlsx".to_string(),
        columns: vec![ColumnHeader {
            key: "primary_name".to_string(),
            label: "Name".to_string(),
        }],
        entries: vec![json!({"entry_number": "1", "primary_name": "Jane Doe"})],
    };
    let bytes = services(&server).render(&request).await.unwrap();

    assert_eq!(bytes, b"PK\x03\x04".to_vec());
}
