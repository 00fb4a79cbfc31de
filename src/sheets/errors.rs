use thiserror::Error;

/// Errors raised while reading the reference spreadsheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("failed to build service-account assertion: {0}")]
    Assertion(#[from] jsonwebtoken::errors::Error),
    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    TokenRejected { status: u16, body: String },
    #[error("values endpoint returned {status}: {body}")]
    ReadRejected { status: u16, body: String },
}
