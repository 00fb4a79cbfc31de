//! REST implementation of the platform protocols.
//!
//! Endpoints follow the platform's resource layout; every response payload is
//! wrapped in a `data` envelope. All bases and credentials come from injected
//! configuration.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::errors::PlatformError;
use super::jobs::JobApi;
use super::secrets::{Secret, SecretsApi};
use super::types::{AckParams, JobOutcome, Sheet, Workbook, WorkbookConfig};
use super::workspace::WorkspaceApi;
use crate::config::PlatformConfig;
use crate::http::RateLimitedHttpClient;
use crate::observability::platform_metrics;
use crate::records::ImportRecord;

#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: RateLimitedHttpClient,
    base_url: String,
    token: Option<String>,
}

/// Response envelope used by every platform endpoint.
#[derive(Debug, Deserialize)]
struct ApiData<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<ImportRecord>,
}

impl PlatformClient {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            http: RateLimitedHttpClient::new(&config.rate_limit),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, PlatformError> {
        platform_metrics().record_request();
        debug!(endpoint, "Platform API call");

        let response = self.http.execute(self.authorize(request)).await.map_err(|e| {
            platform_metrics().record_error();
            PlatformError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            platform_metrics().record_error();
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message,
            });
        }

        Ok(response)
    }

    async fn read_data<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<T, PlatformError> {
        let envelope: ApiData<T> =
            response
                .json()
                .await
                .map_err(|e| PlatformError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                })?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl JobApi for PlatformClient {
    async fn ack(&self, job_id: &str, params: AckParams) -> Result<(), PlatformError> {
        let endpoint = format!("/jobs/{job_id}/ack");
        let request = self.http.inner().post(self.url(&endpoint)).json(&params);
        self.send(request, &endpoint).await?;
        Ok(())
    }

    async fn complete(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError> {
        let endpoint = format!("/jobs/{job_id}/complete");
        let request = self
            .http
            .inner()
            .post(self.url(&endpoint))
            .json(&json!({ "outcome": outcome }));
        self.send(request, &endpoint).await?;
        Ok(())
    }

    async fn fail(&self, job_id: &str, outcome: JobOutcome) -> Result<(), PlatformError> {
        let endpoint = format!("/jobs/{job_id}/fail");
        let request = self
            .http
            .inner()
            .post(self.url(&endpoint))
            .json(&json!({ "outcome": outcome }));
        self.send(request, &endpoint).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkspaceApi for PlatformClient {
    async fn create_workbook(&self, config: &WorkbookConfig) -> Result<Workbook, PlatformError> {
        let endpoint = "/workbooks";
        let request = self.http.inner().post(self.url(endpoint)).json(config);
        let response = self.send(request, endpoint).await?;
        self.read_data(response, endpoint).await
    }

    async fn get_workbook(&self, workbook_id: &str) -> Result<Workbook, PlatformError> {
        let endpoint = format!("/workbooks/{workbook_id}");
        let request = self.http.inner().get(self.url(&endpoint));
        let response = self.send(request, &endpoint).await?;
        self.read_data(response, &endpoint).await
    }

    async fn list_sheets(&self, workbook_id: &str) -> Result<Vec<Sheet>, PlatformError> {
        let endpoint = "/sheets";
        let request = self
            .http
            .inner()
            .get(self.url(endpoint))
            .query(&[("workbookId", workbook_id)]);
        let response = self.send(request, endpoint).await?;
        self.read_data(response, endpoint).await
    }

    async fn validate_sheet(&self, sheet_id: &str) -> Result<(), PlatformError> {
        let endpoint = format!("/sheets/{sheet_id}/validate");
        let request = self.http.inner().post(self.url(&endpoint));
        self.send(request, &endpoint).await?;
        Ok(())
    }

    async fn get_records(
        &self,
        sheet_id: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ImportRecord>, PlatformError> {
        let endpoint = format!("/sheets/{sheet_id}/records");
        let request = self
            .http
            .inner()
            .get(self.url(&endpoint))
            .query(&[
                ("pageNumber", page_number.to_string()),
                ("pageSize", page_size.to_string()),
            ]);
        let response = self.send(request, &endpoint).await?;
        let page: RecordPage = self.read_data(response, &endpoint).await?;
        Ok(page.records)
    }
}

#[async_trait]
impl SecretsApi for PlatformClient {
    async fn list_secrets(&self, environment_id: &str) -> Result<Vec<Secret>, PlatformError> {
        let endpoint = "/secrets";
        let request = self
            .http
            .inner()
            .get(self.url(endpoint))
            .query(&[("environmentId", environment_id)]);
        let response = self.send(request, endpoint).await?;
        self.read_data(response, endpoint).await
    }
}
