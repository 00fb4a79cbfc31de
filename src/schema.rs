//! Static workbook and sheet configuration.
//!
//! One sheet ("Contacts") with three free-text fields, dynamic extra fields
//! allowed. Both UI actions stay disabled until the table has data and every
//! record is valid.

use crate::platform::types::{
    ActionConfig, ActionConstraint, ActionMode, ConstraintKind, FieldConfig, FieldType,
    SheetConfig, WorkbookConfig,
};

pub const SUBMIT_OPERATION: &str = "submitAction";
pub const FINAL_VALIDATION_OPERATION: &str = "finalValidation";
pub const CONTACTS_SLUG: &str = "contacts";

fn text_field(key: &str, label: &str) -> FieldConfig {
    FieldConfig {
        key: key.to_string(),
        field_type: FieldType::String,
        label: label.to_string(),
    }
}

fn gating_constraints() -> Vec<ActionConstraint> {
    vec![
        ActionConstraint::of(ConstraintKind::HasData),
        ActionConstraint::of(ConstraintKind::HasAllValid),
    ]
}

/// Sheet-level final-validation action.
fn final_validation_action() -> ActionConfig {
    ActionConfig {
        operation: FINAL_VALIDATION_OPERATION.to_string(),
        label: "Final validation".to_string(),
        primary: true,
        confirm: true,
        mode: ActionMode::Foreground,
        tooltip: "Validates data one final time before submission".to_string(),
        description: "Data will be validated one final time and some records may become \
                      invalid. Correct any remaining errors and rerun this action; once all \
                      records pass, click Submit in the top-right."
            .to_string(),
        constraints: gating_constraints(),
    }
}

/// Workbook-level submit action.
fn submit_action() -> ActionConfig {
    ActionConfig {
        operation: SUBMIT_OPERATION.to_string(),
        label: "Submit".to_string(),
        primary: true,
        confirm: true,
        mode: ActionMode::Foreground,
        tooltip: "Submit data once you are done auditing the records".to_string(),
        description: "Run Final validation first; if every record passed, click Continue to \
                      send the data."
            .to_string(),
        constraints: gating_constraints(),
    }
}

pub fn contacts_sheet() -> SheetConfig {
    SheetConfig {
        name: "Contacts".to_string(),
        slug: CONTACTS_SLUG.to_string(),
        allow_additional_fields: true,
        fields: vec![
            text_field("first_name", "First name"),
            text_field("last_name", "Last name"),
            text_field("email", "Email"),
        ],
        actions: vec![final_validation_action()],
    }
}

/// Full workbook configuration created during space provisioning.
pub fn workbook_config(name: &str, space_id: &str) -> WorkbookConfig {
    WorkbookConfig {
        name: name.to_string(),
        space_id: space_id.to_string(),
        sheets: vec![contacts_sheet()],
        actions: vec![submit_action()],
    }
}
