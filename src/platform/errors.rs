use thiserror::Error;

use super::secrets::SecretError;

/// Errors surfaced by the import platform client.
///
/// Workflow handlers convert any of these into a job-fail call with a fixed
/// user-facing message; the detail here goes to the logs only.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    #[error("platform returned {status} for {endpoint}: {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("missing `{field}` in event context")]
    MissingContext { field: &'static str },
    #[error("unexpected response shape from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
    #[error(transparent)]
    Secret(#[from] SecretError),
}
