//! Execution orchestration: resolve, submit, poll, decode.
//!
//! Every call owns its job and polling state; nothing is shared between
//! concurrent executions and nothing survives the call. A caller that goes
//! away does not stop the loop, and the job keeps running on the judge.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};

use crate::errors::CodepadError;
use crate::judge::client::JudgeClient;
use crate::judge::decoder::{decode_field, prioritize_output};
use crate::judge::languages::resolve_language;
use crate::judge::types::{ExecutionJob, JobSnapshot, Submission};

/// How often and for how long a job is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Measured from submission
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(800),
            timeout: Duration::from_millis(20_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub output: String,
    pub status: String,
    pub token: String,
    /// Last snapshot received, possibly non-terminal after a timeout
    pub raw: serde_json::Value,
}

pub struct ExecutionOrchestrator {
    judge: Arc<dyn JudgeClient>,
    policy: PollPolicy,
}

impl ExecutionOrchestrator {
    pub fn new(judge: Arc<dyn JudgeClient>) -> Self {
        Self::with_policy(judge, PollPolicy::default())
    }

    pub fn with_policy(judge: Arc<dyn JudgeClient>, policy: PollPolicy) -> Self {
        Self { judge, policy }
    }

    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, CodepadError> {
        let language_id = resolve_language(&request.language, self.judge.as_ref())
            .await
            .ok_or_else(|| CodepadError::UnsupportedLanguage {
                language: request.language.clone(),
            })?;

        let job = self.submit(&request.code, language_id).await?;
        let snapshot = self.poll(&job).await?.ok_or(CodepadError::NoResult)?;

        Ok(Self::outcome(job, snapshot))
    }

    async fn submit(&self, code: &str, language_id: u32) -> Result<ExecutionJob, CodepadError> {
        let raw = self.judge.submit(&Submission::new(code, language_id)).await?;

        let token = match raw.get("token").and_then(|t| t.as_str()) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => {
                log::error!("Judge returned no token for submission: {}", raw);
                return Err(CodepadError::SubmissionFailed { raw });
            }
        };

        log::info!("Submitted job {} (language id {})", token, language_id);
        Ok(ExecutionJob {
            token,
            language_id,
            submitted_at: Instant::now(),
        })
    }

    /// Poll until the job is terminal or the timeout elapses; returns the last
    /// snapshot seen. A failed poll aborts the whole call. A poll still pending
    /// at the deadline is abandoned.
    async fn poll(&self, job: &ExecutionJob) -> Result<Option<JobSnapshot>, CodepadError> {
        let deadline = job.submitted_at + self.policy.timeout;
        let mut last = None;
        let mut polls = 0u32;

        while Instant::now() < deadline {
            let snapshot = match timeout_at(deadline, self.judge.fetch(&job.token)).await {
                Ok(fetched) => fetched?,
                Err(_) => {
                    log::warn!("Job {} poll #{} still pending at the deadline", job.token, polls + 1);
                    break;
                }
            };
            polls += 1;
            log::debug!(
                "Job {} poll #{}: status {} ({})",
                job.token,
                polls,
                snapshot.result.status.id,
                snapshot.result.status.description
            );

            let terminal = snapshot.result.is_terminal();
            last = Some(snapshot);
            if terminal {
                return Ok(last);
            }

            sleep(self.policy.interval).await;
        }

        log::warn!(
            "Job {} not finished after {:?} ({} polls), returning last snapshot",
            job.token,
            self.policy.timeout,
            polls
        );
        Ok(last)
    }

    fn outcome(job: ExecutionJob, snapshot: JobSnapshot) -> ExecutionOutcome {
        let result = &snapshot.result;
        let compile_output = decode_field(result.compile_output.as_deref());
        let stderr = decode_field(result.stderr.as_deref());
        let stdout = decode_field(result.stdout.as_deref());

        ExecutionOutcome {
            output: prioritize_output(&compile_output, &stderr, &stdout),
            status: result.status.description.clone(),
            token: job.token,
            raw: snapshot.raw,
        }
    }
}
