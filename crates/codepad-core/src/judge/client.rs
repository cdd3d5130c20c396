//! HTTP client for the judge service (Judge0 behind RapidAPI).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};

use crate::config::JudgeConfig;
use crate::errors::CodepadError;
use crate::judge::types::{CatalogLanguage, JobSnapshot, Submission};

const SERVICE: &str = "Judge";
const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the orchestrator needs from the judge service.
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Submit a job and return the response body as received.
    async fn submit(&self, submission: &Submission) -> Result<serde_json::Value, CodepadError>;

    /// Fetch the current state of a job.
    async fn fetch(&self, token: &str) -> Result<JobSnapshot, CodepadError>;

    /// Fetch the service's language catalog, in the order the service returns it.
    async fn languages(&self) -> Result<Vec<CatalogLanguage>, CodepadError>;
}

pub struct HttpJudgeClient {
    api_key: Option<String>,
    host_header: String,
    base_url: String,
    client: Client,
}

impl HttpJudgeClient {
    pub fn new(api_key: Option<String>, base_url: String, host_header: String) -> Self {
        Self {
            api_key,
            host_header,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// A missing key is accepted here and reported on the first call instead.
    pub fn from_config(config: &JudgeConfig) -> Self {
        Self::new(
            config.auth.api_key.clone(),
            config.base_url.clone(),
            config.host_header.clone(),
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, CodepadError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CodepadError::missing_credentials(SERVICE))?;
        Ok(request
            .header(API_KEY_HEADER, api_key)
            .header(API_HOST_HEADER, &self.host_header))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, CodepadError> {
        let response = self
            .authorized(request)?
            .send()
            .await
            .map_err(|e| CodepadError::upstream(SERVICE, format!("{} request failed: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {}>", e));
            return Err(CodepadError::upstream(
                SERVICE,
                format!("{} failed with status {}: {}", what, status, error_text),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl JudgeClient for HttpJudgeClient {
    async fn submit(&self, submission: &Submission) -> Result<serde_json::Value, CodepadError> {
        let request = self
            .client
            .post(format!("{}/submissions", self.base_url))
            .query(&[("base64_encoded", "false"), ("wait", "false")])
            .json(submission);

        let response = self.send(request, "Submission").await?;
        response
            .json()
            .await
            .map_err(|e| CodepadError::ParsingError(format!("Failed to parse submission response: {}", e)))
    }

    async fn fetch(&self, token: &str) -> Result<JobSnapshot, CodepadError> {
        let request = self
            .client
            .get(format!("{}/submissions/{}", self.base_url, token))
            .query(&[("base64_encoded", "true"), ("fields", "*")]);

        let response = self.send(request, "Status poll").await?;
        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CodepadError::ParsingError(format!("Failed to parse job status: {}", e)))?;

        JobSnapshot::from_raw(raw)
            .map_err(|e| CodepadError::ParsingError(format!("Unexpected job status shape: {}", e)))
    }

    async fn languages(&self) -> Result<Vec<CatalogLanguage>, CodepadError> {
        let request = self.client.get(format!("{}/languages", self.base_url));

        let response = self.send(request, "Language catalog").await?;
        response
            .json()
            .await
            .map_err(|e| CodepadError::ParsingError(format!("Failed to parse language catalog: {}", e)))
    }
}
