// Workflow orchestration modules
// Each job workflow acknowledges its job and terminates it exactly once

pub mod final_validation;
pub mod ingestion;
pub mod provisioning;
pub mod submission;

pub use final_validation::FinalValidationWorkflow;
pub use ingestion::{IngestionValidator, DUPLICATE_EMAIL_MESSAGE, EMAIL_FIELD};
pub use provisioning::ProvisioningWorkflow;
pub use submission::{
    sheet_label, SheetExport, SubmissionPayload, SubmissionSink, SubmissionWorkflow, WebhookSink,
};
