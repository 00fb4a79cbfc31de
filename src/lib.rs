// Contact Intake Library - import-platform workflow orchestration
// This exposes the core components for testing and integration

pub mod config;
pub mod dispatch;
pub mod events;
pub mod http;
pub mod observability;
pub mod platform;
pub mod records;
pub mod schema;
pub mod sheets;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{config, init_config, FailurePolicy, IntakeConfig};
pub use dispatch::{
    DispatchOutcome, EventDispatcher, JobHandler, JobKind, LifecyclePhase, RecordHook,
};
pub use events::{EventContext, PlatformEvent};
pub use http::RateLimitedHttpClient;
pub use observability::{
    create_workflow_span, platform_metrics, OperationTimer, PlatformApiMetrics,
};
pub use platform::{
    JobApi, PlatformClient, PlatformError, Secret, SecretError, SecretsApi, SheetsCredentials,
    WorkspaceApi,
};
pub use records::{CellValue, ImportRecord, MessageKind, ValidationMessage};
pub use sheets::{ReferenceReader, ServiceAccountAuthenticator, SheetsError, SheetsReferenceReader};
pub use telemetry::{
    create_event_span, generate_correlation_id, init_telemetry, shutdown_telemetry,
};
pub use workflows::{
    FinalValidationWorkflow, IngestionValidator, ProvisioningWorkflow, SubmissionWorkflow,
    WebhookSink, DUPLICATE_EMAIL_MESSAGE,
};
