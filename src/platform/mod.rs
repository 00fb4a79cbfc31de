pub mod client;
pub mod errors;
pub mod jobs;
pub mod mocks;
pub mod secrets;
pub mod types;
pub mod workspace;

pub use client::PlatformClient;
pub use errors::PlatformError;
pub use jobs::JobApi;
pub use secrets::{Secret, SecretError, SecretsApi, SheetsCredentials};
pub use workspace::WorkspaceApi;
