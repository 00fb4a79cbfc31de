//! Final validation: user-triggered server-side re-validation of the
//! workbook's contacts sheet.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::dispatch::JobHandler;
use crate::events::PlatformEvent;
use crate::observability::platform_metrics;
use crate::platform::types::{AckParams, JobOutcome};
use crate::platform::{JobApi, WorkspaceApi};

const ACK_INFO: &str = "Validating data is in progress";
const COMPLETE_MESSAGE: &str =
    "Final validation complete. If any records are invalid, please correct them and rerun this action";
const FAILURE_MESSAGE: &str = "Validating data encountered an error. See event logs";

pub struct FinalValidationWorkflow {
    jobs: Arc<dyn JobApi>,
    workspace: Arc<dyn WorkspaceApi>,
}

impl FinalValidationWorkflow {
    pub fn new(jobs: Arc<dyn JobApi>, workspace: Arc<dyn WorkspaceApi>) -> Self {
        Self { jobs, workspace }
    }

    async fn revalidate(&self, event: &PlatformEvent, job_id: &str) -> Result<()> {
        self.jobs.ack(job_id, AckParams::new(ACK_INFO, 10)).await?;

        let workbook_id = event.context.workbook_id()?;
        let workbook = self.workspace.get_workbook(workbook_id).await?;

        // The contacts sheet is the first sheet by position
        let sheet = workbook
            .sheets
            .first()
            .ok_or_else(|| anyhow!("workbook {workbook_id} has no sheets"))?;
        self.workspace.validate_sheet(&sheet.id).await?;

        info!(sheet_id = %sheet.id, workbook_id, "Sheet re-validated");
        Ok(())
    }
}

#[async_trait]
impl JobHandler for FinalValidationWorkflow {
    async fn handle(&self, event: &PlatformEvent) -> Result<()> {
        let job_id = event.context.job_id()?;

        match self.revalidate(event, job_id).await {
            Ok(()) => {
                // The outcome modal must be acknowledged before the UI unblocks
                self.jobs
                    .complete(
                        job_id,
                        JobOutcome::message(COMPLETE_MESSAGE).with_acknowledge(),
                    )
                    .await?;
                platform_metrics().record_job_completed();
            }
            Err(err) => {
                error!(error = %err, job_id, "Final validation failed");
                self.jobs
                    .fail(job_id, JobOutcome::message(FAILURE_MESSAGE))
                    .await?;
                platform_metrics().record_job_failed();
            }
        }
        Ok(())
    }
}
