//! Range read against the reference spreadsheet.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use super::auth::ServiceAccountAuthenticator;
use super::errors::SheetsError;
use crate::config::ReferenceConfig;
use crate::platform::SheetsCredentials;

/// Source of the reference email set used by ingestion validation.
#[async_trait]
pub trait ReferenceReader: Send + Sync {
    /// Fetch the reference emails. The first row of the range is a header
    /// and is dropped.
    async fn reference_emails(
        &self,
        credentials: &SheetsCredentials,
    ) -> Result<HashSet<String>, SheetsError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads a single column from the spreadsheet values API.
#[derive(Debug, Clone)]
pub struct SheetsReferenceReader {
    http: reqwest::Client,
    auth: ServiceAccountAuthenticator,
    api_base: String,
    range: String,
}

impl SheetsReferenceReader {
    pub fn new(settings: &ReferenceConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            auth: ServiceAccountAuthenticator::new(http.clone(), &settings.token_url),
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            range: settings.range.clone(),
        }
    }
}

#[async_trait]
impl ReferenceReader for SheetsReferenceReader {
    async fn reference_emails(
        &self,
        credentials: &SheetsCredentials,
    ) -> Result<HashSet<String>, SheetsError> {
        let token = self.auth.access_token(credentials).await?;

        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base, credentials.spreadsheet_id, self.range
        );
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::ReadRejected {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        // Row 0 is the column header
        let emails: HashSet<String> = range
            .values
            .into_iter()
            .skip(1)
            .flatten()
            .collect();

        debug!(count = emails.len(), "Loaded reference email set");
        Ok(emails)
    }
}
