//! Assistant handler trait and the request/response bodies of the HTTP surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// Body accepted by `/explain`, `/improve` and `/execute`.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a 400 with a JSON body instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// A validated request: both fields present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeInput {
    pub code: String,
    pub language: String,
}

impl CodeRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            language: Some(language.into()),
        }
    }

    /// Check that both `code` and `language` are present and non-blank.
    pub fn validate(self) -> Result<CodeInput> {
        let code = match self.code {
            Some(code) if !code.trim().is_empty() => code,
            _ => return Err(ServerError::missing_field("code")),
        };
        let language = match self.language {
            Some(language) if !language.trim().is_empty() => language,
            _ => return Err(ServerError::missing_field("language")),
        };
        Ok(CodeInput { code, language })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub improved_code: String,
}

/// Final result of one execute call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecuteResponse {
    /// Single prioritized display string
    pub output: String,
    /// Status description reported by the judge
    pub status: String,
    /// Judge job token
    pub token: String,
    /// Last result snapshot exactly as the judge returned it
    pub raw: serde_json::Value,
}

/// One row of the language menu offered to the editor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    pub label: String,
    pub id: u32,
}

/// Trait implemented by whatever backs the three assistant endpoints.
#[async_trait]
pub trait AssistantHandler: Send + Sync + Clone + 'static {
    /// Produce a natural-language explanation of the code.
    async fn explain(&self, input: CodeInput) -> Result<ExplainResponse>;

    /// Produce an improved version of the code.
    async fn improve(&self, input: CodeInput) -> Result<ImproveResponse>;

    /// Run the code on the judge and wait for its result.
    async fn execute(&self, input: CodeInput) -> Result<ExecuteResponse>;

    /// Languages the editor should offer.
    ///
    /// The default implementation returns an empty list.
    async fn languages(&self) -> Result<Vec<LanguageEntry>> {
        Ok(vec![])
    }

    /// Validate a request body before any upstream call is made.
    ///
    /// The default implementation requires non-blank `code` and `language`.
    async fn validate_input(&self, request: CodeRequest) -> Result<CodeInput> {
        request.validate()
    }
}
