//! Job lifecycle invariants across the workflows.
//!
//! Every job that reaches ready must be acknowledged and then terminated in
//! exactly one of completed/failed - never both, never neither. Verified
//! against call-recording platform doubles.

use std::sync::Arc;

use contact_intake::platform::mocks::{InMemoryWorkspace, JobCall, RecordingJobApi};
use contact_intake::platform::types::{ConstraintKind, Sheet, Workbook};
use contact_intake::{
    EventContext, FinalValidationWorkflow, JobHandler, PlatformEvent, ProvisioningWorkflow,
};

fn ready_event(job: &str, job_id: &str) -> PlatformEvent {
    PlatformEvent {
        id: Some("evt_1".to_string()),
        topic: "job:ready".to_string(),
        context: EventContext {
            job_id: Some(job_id.to_string()),
            job: Some(job.to_string()),
            space_id: Some("space_1".to_string()),
            workbook_id: Some("wb_1".to_string()),
            environment_id: Some("env_1".to_string()),
            ..EventContext::default()
        },
        records: None,
    }
}

fn terminal_count(jobs: &RecordingJobApi, job_id: &str) -> usize {
    jobs.terminal_calls(job_id).len()
}

#[tokio::test]
async fn provisioning_acks_then_completes_exactly_once() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    let workflow =
        ProvisioningWorkflow::new(jobs.clone(), workspace.clone(), "Workbook One");

    workflow
        .handle(&ready_event("space:configure", "job_1"))
        .await
        .unwrap();

    let calls = jobs.calls();
    assert!(matches!(
        &calls[0],
        JobCall::Ack { job_id, progress: 10, .. } if job_id == "job_1"
    ));
    assert_eq!(terminal_count(&jobs, "job_1"), 1);
    assert!(matches!(calls.last().unwrap(), JobCall::Complete { .. }));
}

#[tokio::test]
async fn provisioning_creates_the_expected_workbook_shape() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    let workflow =
        ProvisioningWorkflow::new(jobs.clone(), workspace.clone(), "Workbook One");

    workflow
        .handle(&ready_event("space:configure", "job_1"))
        .await
        .unwrap();

    let created = workspace.created();
    assert_eq!(created.len(), 1);
    let workbook = &created[0];
    assert_eq!(workbook.space_id, "space_1");
    assert_eq!(workbook.sheets.len(), 1);

    let keys: Vec<&str> = workbook.sheets[0]
        .fields
        .iter()
        .map(|f| f.key.as_str())
        .collect();
    assert_eq!(keys, vec!["first_name", "last_name", "email"]);

    assert_eq!(workbook.actions.len(), 1);
    let action = &workbook.actions[0];
    assert_eq!(action.operation, "submitAction");
    let kinds: Vec<ConstraintKind> = action.constraints.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ConstraintKind::HasData, ConstraintKind::HasAllValid]);
}

#[tokio::test]
async fn provisioning_failure_fails_the_job_exactly_once() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    workspace.set_fail_create(true);
    let workflow =
        ProvisioningWorkflow::new(jobs.clone(), workspace.clone(), "Workbook One");

    workflow
        .handle(&ready_event("space:configure", "job_1"))
        .await
        .unwrap();

    let terminals = jobs.terminal_calls("job_1");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Fail { .. }));
}

#[tokio::test]
async fn ack_failure_still_terminates_the_job_as_failed() {
    let jobs = Arc::new(RecordingJobApi::new());
    jobs.set_fail_ack(true);
    let workspace = Arc::new(InMemoryWorkspace::new());
    let workflow =
        ProvisioningWorkflow::new(jobs.clone(), workspace.clone(), "Workbook One");

    workflow
        .handle(&ready_event("space:configure", "job_1"))
        .await
        .unwrap();

    // Nothing was created, and the job still reached a terminal state
    assert!(workspace.created().is_empty());
    let terminals = jobs.terminal_calls("job_1");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Fail { .. }));
}

#[tokio::test]
async fn missing_space_id_fails_the_provisioning_job() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    let workflow =
        ProvisioningWorkflow::new(jobs.clone(), workspace.clone(), "Workbook One");

    let mut event = ready_event("space:configure", "job_1");
    event.context.space_id = None;
    workflow.handle(&event).await.unwrap();

    let terminals = jobs.terminal_calls("job_1");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Fail { .. }));
}

#[tokio::test]
async fn final_validation_validates_the_first_sheet_only() {
    let jobs = Arc::new(RecordingJobApi::new());
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
    let workflow = FinalValidationWorkflow::new(jobs.clone(), workspace.clone());

    workflow
        .handle(&ready_event("sheet:finalValidation", "job_2"))
        .await
        .unwrap();

    assert_eq!(workspace.validated(), vec!["s1".to_string()]);

    let terminals = jobs.terminal_calls("job_2");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(
        &terminals[0],
        JobCall::Complete { acknowledge: Some(true), .. }
    ));
}

#[tokio::test]
async fn final_validation_fails_when_the_workbook_has_no_sheets() {
    let jobs = Arc::new(RecordingJobApi::new());
    let workspace = Arc::new(InMemoryWorkspace::new());
    workspace.insert_workbook(Workbook {
        id: "wb_1".to_string(),
        name: "Workbook One".to_string(),
        sheets: vec![],
    });
    let workflow = FinalValidationWorkflow::new(jobs.clone(), workspace.clone());

    workflow
        .handle(&ready_event("sheet:finalValidation", "job_2"))
        .await
        .unwrap();

    assert!(workspace.validated().is_empty());
    let terminals = jobs.terminal_calls("job_2");
    assert_eq!(terminals.len(), 1);
    assert!(matches!(&terminals[0], JobCall::Fail { .. }));
}
