//! Workspace resource protocol: workbooks, sheets, records.

use async_trait::async_trait;

use super::errors::PlatformError;
use super::types::{Sheet, Workbook, WorkbookConfig};
use crate::records::ImportRecord;

#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Create a workbook (with its sheets and actions) inside a space.
    async fn create_workbook(&self, config: &WorkbookConfig) -> Result<Workbook, PlatformError>;

    /// Fetch a workbook, including its sheet listing.
    async fn get_workbook(&self, workbook_id: &str) -> Result<Workbook, PlatformError>;

    /// List the sheets belonging to a workbook, in platform order.
    async fn list_sheets(&self, workbook_id: &str) -> Result<Vec<Sheet>, PlatformError>;

    /// Re-run server-side validation across a whole sheet.
    async fn validate_sheet(&self, sheet_id: &str) -> Result<(), PlatformError>;

    /// Fetch one page of a sheet's records. Pages are 1-based; a page shorter
    /// than `page_size` is the last one.
    async fn get_records(
        &self,
        sheet_id: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ImportRecord>, PlatformError>;
}
