//! Submission workflow: payload assembly, pagination, failure semantics,
//! and idempotence against unchanged remote state.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use contact_intake::config::SubmissionConfig;
use contact_intake::platform::mocks::{InMemoryWorkspace, JobCall, RecordingJobApi};
use contact_intake::platform::types::{Sheet, Workbook};
use contact_intake::workflows::{SubmissionPayload, SubmissionSink, SubmissionWorkflow, WebhookSink};
use contact_intake::{EventContext, ImportRecord, JobHandler, PlatformEvent};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sink double that records every delivered body.
#[derive(Default)]
struct RecordingSink {
    deliveries: Mutex<Vec<serde_json::Value>>,
    fail: AtomicBool,
}

impl RecordingSink {
    fn deliveries(&self) -> Vec<serde_json::Value> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> anyhow::Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push(serde_json::to_value(payload)?);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected sink failure");
        }
        Ok(())
    }
}

fn submit_event(job_id: &str) -> PlatformEvent {
    PlatformEvent {
        id: None,
        topic: "job:ready".to_string(),
        context: EventContext {
            job_id: Some(job_id.to_string()),
            job: Some("workbook:submitAction".to_string()),
            workbook_id: Some("wb_1".to_string()),
            ..EventContext::default()
        },
        records: None,
    }
}

fn settings(page_size: u32) -> SubmissionConfig {
    SubmissionConfig {
        endpoint_url: "http://unused.invalid".to_string(),
        page_size,
    }
}

fn two_sheet_workspace() -> Arc<InMemoryWorkspace> {
    let workspace = Arc::new(InMemoryWorkspace::new());
    workspace.insert_workbook(Workbook {
        id: "wb_1".to_string(),
        name: "Workbook One".to_string(),
        sheets: vec![
            Sheet {
                id: "s1".to_string(),
                name: None,
                slug: None,
            },
            Sheet {
                id: "s2".to_string(),
                name: None,
                slug: None,
            },
        ],
    });
    workspace.insert_records(
        "s1",
        vec![ImportRecord::new("rec_a").with_value("email", "a@x.com")],
    );
    workspace.insert_records(
        "s2",
        vec![ImportRecord::new("rec_b").with_value("email", "b@x.com")],
    );
    workspace
}

#[tokio::test]
async fn post_body_maps_sheet_labels_to_record_sets() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = two_sheet_workspace();
    let sink = Arc::new(RecordingSink::default());
    let workflow = SubmissionWorkflow::new(
        jobs.clone(),
        workspace.clone(),
        sink.clone(),
        &settings(10_000),
    );

    workflow.handle(&submit_event("job_3")).await.unwrap();

    let deliveries = sink.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(
        deliveries[0],
        serde_json::json!({
            "records": {
                "Sheet[0]": [
                    { "id": "rec_a", "values": { "email": { "value": "a@x.com" } } }
                ],
                "Sheet[1]": [
                    { "id": "rec_b", "values": { "email": { "value": "b@x.com" } } }
                ]
            }
        })
    );

    let terminals = jobs.terminal_calls("job_3");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Complete { .. }));
}

#[tokio::test]
async fn sink_rejection_fails_the_job_without_completion() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = two_sheet_workspace();
    let sink = Arc::new(RecordingSink::default());
    sink.fail.store(true, Ordering::SeqCst);
    let workflow = SubmissionWorkflow::new(
        jobs.clone(),
        workspace.clone(),
        sink.clone(),
        &settings(10_000),
    );

    workflow.handle(&submit_event("job_3")).await.unwrap();

    let terminals = jobs.terminal_calls("job_3");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Fail { .. }));
}

#[tokio::test]
async fn rerun_with_unchanged_remote_state_is_idempotent() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = two_sheet_workspace();
    let sink = Arc::new(RecordingSink::default());
    let workflow = SubmissionWorkflow::new(
        jobs.clone(),
        workspace.clone(),
        sink.clone(),
        &settings(10_000),
    );

    workflow.handle(&submit_event("job_3")).await.unwrap();
    workflow.handle(&submit_event("job_4")).await.unwrap();

    let deliveries = sink.deliveries();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[0], deliveries[1]);
}

#[tokio::test]
async fn record_fetch_pages_past_the_platform_bound() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    workspace.insert_workbook(Workbook {
        id: "wb_1".to_string(),
        name: "Workbook One".to_string(),
        sheets: vec![Sheet {
            id: "s1".to_string(),
            name: None,
            slug: None,
        }],
    });
    let many: Vec<ImportRecord> = (0..5)
        .map(|i| ImportRecord::new(format!("rec_{i}")).with_value("email", "a@x.com"))
        .collect();
    workspace.insert_records("s1", many);

    let sink = Arc::new(RecordingSink::default());
    // Page size of 2 forces three fetches for five records
    let workflow =
        SubmissionWorkflow::new(jobs.clone(), workspace.clone(), sink.clone(), &settings(2));

    workflow.handle(&submit_event("job_5")).await.unwrap();

    let deliveries = sink.deliveries();
    let records = deliveries[0]["records"]["Sheet[0]"].as_array().unwrap();
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn webhook_sink_posts_json_to_the_configured_endpoint() {
    let server = MockServer::start().await;
    let expected = serde_json::json!({
        "records": {
            "Sheet[0]": [
                { "id": "rec_a", "values": { "email": { "value": "a@x.com" } } }
            ]
        }
    });
    Mock::given(method("POST"))
        .and(path("/intake"))
        .and(header("content-type", "application/json"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = WebhookSink::new(&SubmissionConfig {
        endpoint_url: format!("{}/intake", server.uri()),
        page_size: 10_000,
    });
    let payload = SubmissionPayload {
        sheets: vec![contact_intake::workflows::SheetExport {
            label: contact_intake::workflows::sheet_label(0),
            records: vec![ImportRecord::new("rec_a").with_value("email", "a@x.com")],
        }],
    };

    sink.deliver(&payload).await.unwrap();
}

#[tokio::test]
async fn webhook_sink_propagates_non_success_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = WebhookSink::new(&SubmissionConfig {
        endpoint_url: server.uri(),
        page_size: 10_000,
    });
    let payload = SubmissionPayload::default();

    assert!(sink.deliver(&payload).await.is_err());
}
