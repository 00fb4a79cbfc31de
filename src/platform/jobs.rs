//! Job lifecycle protocol: acknowledge, complete, fail.
//!
//! Every workflow must call `ack` once a job is picked up and then exactly
//! one of `complete`/`fail` before returning. The platform owns job state;
//! this client only transitions it.

use async_trait::async_trait;

use super::errors::PlatformError;
use super::types::{AckParams, JobOutcome};

#[async_trait]
pub trait JobApi: Send + Sync {
    /// Mark the job as in progress with an informational message.
    async fn ack(&self, job_id: &str, params: AckParams) -> Result<(), PlatformError>;

    /// Terminate the job successfully with a user-facing outcome.
    async fn complete(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError>;

    /// Terminate the job as failed with a user-facing outcome.
    async fn fail(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError>;
}
