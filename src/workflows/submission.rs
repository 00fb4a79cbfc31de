//! Submission: gather every record of every sheet and relay the whole set to
//! the external sink in one POST.
//!
//! All-or-nothing per invocation: no retry, no partial recovery. Re-running
//! the job re-fetches and re-sends everything, so unchanged remote state
//! yields an identical request body.

use anyhow::Result;
use async_trait::async_trait;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::SubmissionConfig;
use crate::dispatch::JobHandler;
use crate::events::PlatformEvent;
use crate::observability::platform_metrics;
use crate::platform::types::{AckParams, JobOutcome};
use crate::platform::{JobApi, WorkspaceApi};
use crate::records::ImportRecord;

const ACK_INFO: &str = "Submit job received, gathering records";
const COMPLETE_MESSAGE: &str = "Data successfully submitted";
const FAILURE_MESSAGE: &str = "Submitting the data encountered an error. See event logs";

/// Synthetic payload key for the sheet at `index` in the workbook's listing.
pub fn sheet_label(index: usize) -> String {
    format!("Sheet[{index}]")
}

/// One sheet's share of the submission payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetExport {
    pub label: String,
    pub records: Vec<ImportRecord>,
}

/// The full submission body: `{"records": {"Sheet[0]": [...], ...}}`, with
/// sheets in workbook listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
    pub sheets: Vec<SheetExport>,
}

struct RecordsMap<'a>(&'a [SheetExport]);

impl Serialize for RecordsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for export in self.0 {
            map.serialize_entry(&export.label, &export.records)?;
        }
        map.end()
    }
}

impl Serialize for SubmissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("records", &RecordsMap(&self.sheets))?;
        map.end()
    }
}

/// Destination for finalized data.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<()>;
}

/// POSTs the payload as JSON to the configured endpoint. A non-success
/// status is an error.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    endpoint_url: String,
}

impl WebhookSink {
    pub fn new(settings: &SubmissionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint_url: settings.endpoint_url.clone(),
        }
    }
}

#[async_trait]
impl SubmissionSink for WebhookSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<()> {
        let response = self
            .http
            .post(&self.endpoint_url)
            .json(payload)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }
}

pub struct SubmissionWorkflow {
    jobs: Arc<dyn JobApi>,
    workspace: Arc<dyn WorkspaceApi>,
    sink: Arc<dyn SubmissionSink>,
    page_size: u32,
}

impl SubmissionWorkflow {
    pub fn new(
        jobs: Arc<dyn JobApi>,
        workspace: Arc<dyn WorkspaceApi>,
        sink: Arc<dyn SubmissionSink>,
        settings: &SubmissionConfig,
    ) -> Self {
        Self {
            jobs,
            workspace,
            sink,
            page_size: settings.page_size,
        }
    }

    /// Fetch a sheet's full record set, paging until a short page. The
    /// platform's default page bound would otherwise silently truncate
    /// large sheets.
    async fn fetch_all_records(&self, sheet_id: &str) -> Result<Vec<ImportRecord>> {
        let page_size = self.page_size.max(1);
        let mut all = Vec::new();
        let mut page_number = 1;
        loop {
            let page = self
                .workspace
                .get_records(sheet_id, page_number, page_size)
                .await?;
            let fetched = page.len();
            all.extend(page);
            if fetched < page_size as usize {
                break;
            }
            page_number += 1;
        }
        Ok(all)
    }

    async fn submit(&self, event: &PlatformEvent, job_id: &str) -> Result<()> {
        self.jobs.ack(job_id, AckParams::new(ACK_INFO, 10)).await?;

        let workbook_id = event.context.workbook_id()?;
        let sheets = self.workspace.list_sheets(workbook_id).await?;

        let mut payload = SubmissionPayload::default();
        for (index, sheet) in sheets.iter().enumerate() {
            let records = self.fetch_all_records(&sheet.id).await?;
            payload.sheets.push(SheetExport {
                label: sheet_label(index),
                records,
            });
        }

        self.sink.deliver(&payload).await?;
        info!(
            workbook_id,
            sheets = payload.sheets.len(),
            "Submission delivered"
        );
        Ok(())
    }
}

#[async_trait]
impl JobHandler for SubmissionWorkflow {
    async fn handle(&self, event: &PlatformEvent) -> Result<()> {
        let job_id = event.context.job_id()?;

        match self.submit(event, job_id).await {
            Ok(()) => {
                self.jobs
                    .complete(job_id, JobOutcome::message(COMPLETE_MESSAGE))
                    .await?;
                platform_metrics().record_job_completed();
            }
            Err(err) => {
                error!(error = %err, job_id, "Submission failed");
                self.jobs
                    .fail(job_id, JobOutcome::message(FAILURE_MESSAGE))
                    .await?;
                platform_metrics().record_job_failed();
            }
        }
        Ok(())
    }
}
