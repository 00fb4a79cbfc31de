//! Service-account authentication for the spreadsheet API.
//!
//! A short-lived RS256 assertion is exchanged for a bearer token at the
//! configured token endpoint. Scope is read-only; this client never writes
//! to the reference spreadsheet.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::SheetsError;
use crate::platform::SheetsCredentials;

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone)]
pub struct ServiceAccountAuthenticator {
    http: reqwest::Client,
    token_url: String,
}

impl ServiceAccountAuthenticator {
    pub fn new(http: reqwest::Client, token_url: &str) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
        }
    }

    /// Exchange the service-account credentials for a bearer token.
    pub async fn access_token(
        &self,
        credentials: &SheetsCredentials,
    ) -> Result<String, SheetsError> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &credentials.client_email,
            scope: READONLY_SCOPE,
            aud: &self.token_url,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        debug!(client_email = %credentials.client_email, "Exchanging service-account assertion");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}
