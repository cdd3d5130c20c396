//! Google Gemini API client implementation
//!
//! Single-turn `generateContent` calls against Google's Generative AI API.

use crate::config::LlmConfig;
use crate::errors::CodepadError;
use crate::llm::LLM;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Gemini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Google Gemini API client
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    client: Client,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self::with_base_url(
            api_key,
            model,
            crate::config::DEFAULT_GEMINI_BASE_URL.to_string(),
        )
    }

    /// Create a new Gemini client with custom base URL
    pub fn with_base_url(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
        }
    }

    /// Create a Gemini client from configuration. A missing key is accepted
    /// here and reported on the first call instead.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut client = Self::with_base_url(
            config.auth.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        );
        client.temperature = config.temperature;
        client.max_output_tokens = config.max_output_tokens;
        client
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetails {
    code: u16,
    message: String,
}

impl GeminiClient {
    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }

    fn extract_text(response: GeminiResponse) -> Result<String, CodepadError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CodepadError::ParsingError("No candidates in Gemini response".to_string()))?;

        let text: Vec<String> = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(CodepadError::ParsingError(format!(
                "Gemini response contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text.join(""))
    }
}

#[async_trait]
impl LLM for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CodepadError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CodepadError::missing_credentials(SERVICE))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        log::debug!("Sending {} character prompt to Gemini model {}", prompt.len(), self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| CodepadError::upstream(SERVICE, format!("Gemini API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {}>", e));

            if let Ok(gemini_error) = serde_json::from_str::<GeminiError>(&error_text) {
                return Err(CodepadError::upstream(
                    SERVICE,
                    format!(
                        "Gemini API error {}: {}",
                        gemini_error.error.code, gemini_error.error.message
                    ),
                ));
            }

            return Err(CodepadError::upstream(
                SERVICE,
                format!("Gemini API request failed with status {}: {}", status, error_text),
            ));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| CodepadError::ParsingError(format!("Failed to parse Gemini response: {}", e)))?;

        Self::extract_text(gemini_response)
    }
}
