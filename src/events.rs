use serde::{Deserialize, Serialize};

use crate::platform::PlatformError;
use crate::records::ImportRecord;

/// A lifecycle event delivered by the hosting runtime.
///
/// Job events carry the job descriptor in `context.job` (for example
/// `"space:configure"`); record events carry the affected records inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEvent {
    #[serde(default)]
    pub id: Option<String>,
    /// Event topic, e.g. `job:ready` or `records:created`
    pub topic: String,
    #[serde(default)]
    pub context: EventContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<ImportRecord>>,
}

/// Identifiers scoped to one event. Which fields are present depends on the
/// topic; workflows require the ones they need and fail the job otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    #[serde(default)]
    pub job_id: Option<String>,
    /// Job descriptor, `<domain>:<operation>`
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub workbook_id: Option<String>,
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default)]
    pub sheet_slug: Option<String>,
    #[serde(default)]
    pub environment_id: Option<String>,
}

impl EventContext {
    pub fn job_id(&self) -> Result<&str, PlatformError> {
        require(&self.job_id, "jobId")
    }

    pub fn space_id(&self) -> Result<&str, PlatformError> {
        require(&self.space_id, "spaceId")
    }

    pub fn workbook_id(&self) -> Result<&str, PlatformError> {
        require(&self.workbook_id, "workbookId")
    }

    pub fn environment_id(&self) -> Result<&str, PlatformError> {
        require(&self.environment_id, "environmentId")
    }
}

fn require<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, PlatformError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(PlatformError::MissingContext { field })
}

impl PlatformEvent {
    /// Job events report their lifecycle phase in the topic suffix.
    pub fn is_job_event(&self) -> bool {
        self.topic.starts_with("job:")
    }

    pub fn is_record_event(&self) -> bool {
        matches!(self.topic.as_str(), "records:created" | "records:updated")
    }
}
