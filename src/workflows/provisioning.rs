//! Space provisioning: create the workbook, sheet, and submit action when a
//! space-configure job becomes ready.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::dispatch::JobHandler;
use crate::events::PlatformEvent;
use crate::observability::platform_metrics;
use crate::platform::types::{AckParams, JobOutcome};
use crate::platform::{JobApi, WorkspaceApi};
use crate::schema;

const ACK_INFO: &str = "Space is being created, please hold";
const COMPLETE_MESSAGE: &str =
    "Space is created with 1 workbook, 1 sheet, and a workbook-level Submit action";
const FAILURE_MESSAGE: &str = "Creating a Space encountered an error. See event logs";

pub struct ProvisioningWorkflow {
    jobs: Arc<dyn JobApi>,
    workspace: Arc<dyn WorkspaceApi>,
    workbook_name: String,
}

impl ProvisioningWorkflow {
    pub fn new(
        jobs: Arc<dyn JobApi>,
        workspace: Arc<dyn WorkspaceApi>,
        workbook_name: &str,
    ) -> Self {
        Self {
            jobs,
            workspace,
            workbook_name: workbook_name.to_string(),
        }
    }

    async fn provision(&self, event: &PlatformEvent, job_id: &str) -> Result<()> {
        self.jobs.ack(job_id, AckParams::new(ACK_INFO, 10)).await?;

        let space_id = event.context.space_id()?;
        let config = schema::workbook_config(&self.workbook_name, space_id);
        let workbook = self.workspace.create_workbook(&config).await?;

        // No rollback on later failures: platform resource creation is
        // atomic per call, and the job re-run affordance is the recovery path.
        info!(workbook_id = %workbook.id, space_id, "Workbook provisioned");
        Ok(())
    }
}

#[async_trait]
impl JobHandler for ProvisioningWorkflow {
    async fn handle(&self, event: &PlatformEvent) -> Result<()> {
        // A job we cannot identify cannot be terminated either
        let job_id = event.context.job_id()?;

        match self.provision(event, job_id).await {
            Ok(()) => {
                self.jobs
                    .complete(job_id, JobOutcome::message(COMPLETE_MESSAGE))
                    .await?;
                platform_metrics().record_job_completed();
            }
            Err(err) => {
                error!(error = %err, job_id, "Provisioning failed");
                self.jobs
                    .fail(job_id, JobOutcome::message(FAILURE_MESSAGE))
                    .await?;
                platform_metrics().record_job_failed();
            }
        }
        Ok(())
    }
}
