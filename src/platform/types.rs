use serde::{Deserialize, Serialize};

/// Progress acknowledgment sent when a job starts executing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckParams {
    pub info: String,
    pub progress: u8,
}

impl AckParams {
    pub fn new(info: &str, progress: u8) -> Self {
        Self {
            info: info.to_string(),
            progress,
        }
    }
}

/// Terminal outcome of a job, shown to the user in the importer UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub message: String,
    /// When set, the outcome modal blocks the UI until dismissed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledge: Option<bool>,
}

impl JobOutcome {
    pub fn message(text: &str) -> Self {
        Self {
            message: text.to_string(),
            acknowledge: None,
        }
    }

    pub fn with_acknowledge(mut self) -> Self {
        self.acknowledge = Some(true);
        self
    }
}

/// Workbook creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookConfig {
    pub name: String,
    pub space_id: String,
    pub sheets: Vec<SheetConfig>,
    pub actions: Vec<ActionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    pub name: String,
    pub slug: String,
    pub allow_additional_fields: bool,
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
}

/// A UI action button attached to a workbook or sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub operation: String,
    pub label: String,
    pub primary: bool,
    pub confirm: bool,
    pub mode: ActionMode,
    pub tooltip: String,
    pub description: String,
    pub constraints: Vec<ActionConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    /// Blocks the UI with a progress modal while the job runs
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConstraint {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
}

impl ActionConstraint {
    pub fn of(kind: ConstraintKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// At least one populated cell exists
    HasData,
    /// Every record is currently valid
    HasAllValid,
}

/// Workbook as returned by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}
