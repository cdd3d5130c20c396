//! Binds the requesters and the execution orchestrator to the HTTP surface.

use std::sync::Arc;

use async_trait::async_trait;
use codepad_http::{
    AssistantHandler, CodeInput, ExecuteResponse, ExplainResponse, ImproveResponse, LanguageEntry,
    Result, ServerError,
};

use crate::config::CodepadConfig;
use crate::judge::{
    ExecutionOrchestrator, ExecutionRequest, HttpJudgeClient, JudgeClient, PollPolicy,
    COMMON_LANGUAGES,
};
use crate::llm::{GeminiClient, LLM};
use crate::requester::Requester;

/// Stateless apart from its clients; clones share them.
#[derive(Clone)]
pub struct CodepadHandler {
    requester: Arc<Requester>,
    orchestrator: Arc<ExecutionOrchestrator>,
}

impl CodepadHandler {
    pub fn new(llm: Arc<dyn LLM>, judge: Arc<dyn JudgeClient>, policy: PollPolicy) -> Self {
        Self {
            requester: Arc::new(Requester::new(llm)),
            orchestrator: Arc::new(ExecutionOrchestrator::with_policy(judge, policy)),
        }
    }

    /// Build the handler with the HTTP clients described by the configuration.
    pub fn from_config(config: &CodepadConfig) -> Self {
        let llm = GeminiClient::from_config(&config.llm);
        let judge = HttpJudgeClient::from_config(&config.judge);
        log::info!(
            "Using Gemini model {} (credentials: {}), judge at {} (credentials: {})",
            config.llm.model,
            llm.has_credentials(),
            config.judge.base_url,
            judge.has_credentials()
        );
        Self::new(Arc::new(llm), Arc::new(judge), config.judge.poll_policy())
    }
}

#[async_trait]
impl AssistantHandler for CodepadHandler {
    async fn explain(&self, input: CodeInput) -> Result<ExplainResponse> {
        let explanation = self
            .requester
            .explain(&input.code, &input.language)
            .await
            .map_err(ServerError::from)?;
        Ok(ExplainResponse { explanation })
    }

    async fn improve(&self, input: CodeInput) -> Result<ImproveResponse> {
        let improved_code = self
            .requester
            .improve(&input.code, &input.language)
            .await
            .map_err(ServerError::from)?;
        Ok(ImproveResponse { improved_code })
    }

    async fn execute(&self, input: CodeInput) -> Result<ExecuteResponse> {
        let request = ExecutionRequest {
            code: input.code,
            language: input.language,
        };
        let outcome = self
            .orchestrator
            .execute(&request)
            .await
            .map_err(ServerError::from)?;

        Ok(ExecuteResponse {
            output: outcome.output,
            status: outcome.status,
            token: outcome.token,
            raw: outcome.raw,
        })
    }

    async fn languages(&self) -> Result<Vec<LanguageEntry>> {
        Ok(COMMON_LANGUAGES
            .iter()
            .map(|(label, id)| LanguageEntry {
                label: label.to_string(),
                id: *id,
            })
            .collect())
    }
}
