// src/test_utils/scripted.rs
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::errors::CodepadError;
use crate::judge::{CatalogLanguage, JobSnapshot, JudgeClient, Submission};
use crate::llm::LLM;

/// A poll response for job "tok-1"; `extra` fields are merged over the status.
pub fn snapshot(id: u32, description: &str, extra: Value) -> JobSnapshot {
    let mut raw = json!({
        "token": "tok-1",
        "status": {"id": id, "description": description},
    });
    if let (Some(target), Value::Object(fields)) = (raw.as_object_mut(), extra) {
        target.extend(fields);
    }
    JobSnapshot::from_raw(raw).unwrap()
}

/// In-memory judge that replays scripted responses and counts calls.
pub struct ScriptedJudge {
    submit_response: Value,
    polls: Mutex<VecDeque<JobSnapshot>>,
    last_poll: Mutex<Option<JobSnapshot>>,
    fetch_error: Option<CodepadError>,
    stall_after: Option<usize>,
    catalog: Result<Vec<CatalogLanguage>, CodepadError>,
    submissions: Mutex<Vec<Submission>>,
    fetch_calls: Mutex<usize>,
    catalog_calls: Mutex<usize>,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self {
            submit_response: json!({"token": "tok-1"}),
            polls: Mutex::new(VecDeque::new()),
            last_poll: Mutex::new(None),
            fetch_error: None,
            stall_after: None,
            catalog: Ok(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(0),
            catalog_calls: Mutex::new(0),
        }
    }

    /// Poll responses in order; the last one repeats once they run out.
    pub fn with_polls(self, polls: Vec<JobSnapshot>) -> Self {
        *self.polls.lock().unwrap() = VecDeque::from(polls);
        self
    }

    pub fn with_submit_response(mut self, response: Value) -> Self {
        self.submit_response = response;
        self
    }

    pub fn with_fetch_error(mut self, error: CodepadError) -> Self {
        self.fetch_error = Some(error);
        self
    }

    /// Polls after the first `answered` never complete.
    pub fn with_stall_after(mut self, answered: usize) -> Self {
        self.stall_after = Some(answered);
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<CatalogLanguage>) -> Self {
        self.catalog = Ok(catalog);
        self
    }

    pub fn with_catalog_error(mut self, error: CodepadError) -> Self {
        self.catalog = Err(error);
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.lock().unwrap()
    }

    pub fn catalog_calls(&self) -> usize {
        *self.catalog_calls.lock().unwrap()
    }
}

impl Default for ScriptedJudge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JudgeClient for ScriptedJudge {
    async fn submit(&self, submission: &Submission) -> Result<Value, CodepadError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(self.submit_response.clone())
    }

    async fn fetch(&self, _token: &str) -> Result<JobSnapshot, CodepadError> {
        let call = {
            let mut calls = self.fetch_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.stall_after.is_some_and(|answered| call > answered) {
            std::future::pending::<()>().await;
        }
        if let Some(error) = &self.fetch_error {
            return Err(error.clone());
        }

        let mut last = self.last_poll.lock().unwrap();
        if let Some(next) = self.polls.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        last.clone()
            .ok_or_else(|| CodepadError::upstream("Judge", "no scripted poll response"))
    }

    async fn languages(&self) -> Result<Vec<CatalogLanguage>, CodepadError> {
        *self.catalog_calls.lock().unwrap() += 1;
        self.catalog.clone()
    }
}

/// In-memory LLM that replays scripted completions and records prompts.
pub struct ScriptedLLM {
    responses: Mutex<VecDeque<Result<String, CodepadError>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLLM {
    pub fn new(responses: Vec<Result<String, CodepadError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn complete(&self, prompt: &str) -> Result<String, CodepadError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CodepadError::upstream("Gemini", "ran out of scripted responses")))
    }
}
