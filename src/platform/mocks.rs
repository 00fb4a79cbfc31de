// Mock implementations for testing - no network, no side effects

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::errors::PlatformError;
use super::jobs::JobApi;
use super::secrets::{Secret, SecretsApi};
use super::types::{AckParams, JobOutcome, Sheet, Workbook, WorkbookConfig};
use super::workspace::WorkspaceApi;
use crate::records::ImportRecord;

/// One observed job-lifecycle call, in invocation order.
#[derive(Debug, Clone, PartialEq)]
pub enum JobCall {
    Ack {
        job_id: String,
        info: String,
        progress: u8,
    },
    Complete {
        job_id: String,
        message: String,
        acknowledge: Option<bool>,
    },
    Fail {
        job_id: String,
        message: String,
    },
}

/// Job API double that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingJobApi {
    calls: Mutex<Vec<JobCall>>,
    fail_ack: AtomicBool,
}

impl RecordingJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `ack` calls return an error.
    pub fn set_fail_ack(&self, fail: bool) {
        self.fail_ack.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<JobCall> {
        self.calls.lock().expect("job call log poisoned").clone()
    }

    /// Terminal calls (complete or fail) observed for a job.
    pub fn terminal_calls(&self, job_id: &str) -> Vec<JobCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                JobCall::Complete { job_id: id, .. } | JobCall::Fail { job_id: id, .. } => {
                    id == job_id
                }
                JobCall::Ack { .. } => false,
            })
            .collect()
    }

    fn record(&self, call: JobCall) {
        self.calls.lock().expect("job call log poisoned").push(call);
    }
}

#[async_trait]
impl JobApi for RecordingJobApi {
    async fn ack(&self, job_id: &str, params: AckParams) -> Result<(), PlatformError> {
        self.record(JobCall::Ack {
            job_id: job_id.to_string(),
            info: params.info,
            progress: params.progress,
        });
        if self.fail_ack.load(Ordering::SeqCst) {
            return Err(PlatformError::Api {
                status: 503,
                endpoint: format!("/jobs/{job_id}/ack"),
                message: "injected ack failure".to_string(),
            });
        }
        Ok(())
    }

    async fn complete(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError> {
        self.record(JobCall::Complete {
            job_id: job_id.to_string(),
            message: outcome.message,
            acknowledge: outcome.acknowledge,
        });
        Ok(())
    }

    async fn fail(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError> {
        self.record(JobCall::Fail {
            job_id: job_id.to_string(),
            message: outcome.message,
        });
        Ok(())
    }
}

/// Workspace API double backed by in-memory state.
#[derive(Debug, Default)]
pub struct InMemoryWorkspace {
    pub created_workbooks: Mutex<Vec<WorkbookConfig>>,
    workbooks: Mutex<HashMap<String, Workbook>>,
    records_by_sheet: Mutex<HashMap<String, Vec<ImportRecord>>>,
    pub validated_sheets: Mutex<Vec<String>>,
    fail_create: AtomicBool,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_workbook(&self, workbook: Workbook) {
        self.workbooks
            .lock()
            .expect("workbook store poisoned")
            .insert(workbook.id.clone(), workbook);
    }

    pub fn insert_records(&self, sheet_id: &str, records: Vec<ImportRecord>) {
        self.records_by_sheet
            .lock()
            .expect("record store poisoned")
            .insert(sheet_id.to_string(), records);
    }

    /// Make `create_workbook` return an error.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<WorkbookConfig> {
        self.created_workbooks
            .lock()
            .expect("workbook store poisoned")
            .clone()
    }

    pub fn validated(&self) -> Vec<String> {
        self.validated_sheets
            .lock()
            .expect("validation log poisoned")
            .clone()
    }
}

#[async_trait]
impl WorkspaceApi for InMemoryWorkspace {
    async fn create_workbook(&self, config: &WorkbookConfig) -> Result<Workbook, PlatformError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(PlatformError::Api {
                status: 500,
                endpoint: "/workbooks".to_string(),
                message: "injected create failure".to_string(),
            });
        }
        self.created_workbooks
            .lock()
            .expect("workbook store poisoned")
            .push(config.clone());
        Ok(Workbook {
            id: "wb_mock".to_string(),
            name: config.name.clone(),
            sheets: vec![],
        })
    }

    async fn get_workbook(&self, workbook_id: &str) -> Result<Workbook, PlatformError> {
        self.workbooks
            .lock()
            .expect("workbook store poisoned")
            .get(workbook_id)
            .cloned()
            .ok_or_else(|| PlatformError::Api {
                status: 404,
                endpoint: format!("/workbooks/{workbook_id}"),
                message: "not found".to_string(),
            })
    }

    async fn list_sheets(&self, workbook_id: &str) -> Result<Vec<Sheet>, PlatformError> {
        Ok(self.get_workbook(workbook_id).await?.sheets)
    }

    async fn validate_sheet(&self, sheet_id: &str) -> Result<(), PlatformError> {
        self.validated_sheets
            .lock()
            .expect("validation log poisoned")
            .push(sheet_id.to_string());
        Ok(())
    }

    async fn get_records(
        &self,
        sheet_id: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ImportRecord>, PlatformError> {
        let store = self.records_by_sheet.lock().expect("record store poisoned");
        let all = store.get(sheet_id).cloned().unwrap_or_default();
        let start = (page_number.saturating_sub(1) as usize) * page_size as usize;
        Ok(all
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect())
    }
}

/// Secrets API double serving a fixed list.
#[derive(Debug, Default)]
pub struct StaticSecrets {
    secrets: Mutex<Vec<Secret>>,
    fail: AtomicBool,
}

impl StaticSecrets {
    pub fn new(values: &[&str]) -> Self {
        Self {
            secrets: Mutex::new(
                values
                    .iter()
                    .map(|v| Secret {
                        name: None,
                        value: v.to_string(),
                    })
                    .collect(),
            ),
            fail: AtomicBool::new(false),
        }
    }

    /// Make `list_secrets` return an error.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretsApi for StaticSecrets {
    async fn list_secrets(&self, _environment_id: &str) -> Result<Vec<Secret>, PlatformError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlatformError::Api {
                status: 500,
                endpoint: "/secrets".to_string(),
                message: "injected secret failure".to_string(),
            });
        }
        Ok(self.secrets.lock().expect("secret store poisoned").clone())
    }
}
