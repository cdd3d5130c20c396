//! Wire types of the judge service.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

pub const STATUS_IN_QUEUE: u32 = 1;
pub const STATUS_PROCESSING: u32 = 2;

/// Body of `POST /submissions`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Submission {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
}

impl Submission {
    pub fn new(source_code: impl Into<String>, language_id: u32) -> Self {
        Self {
            source_code: source_code.into(),
            language_id,
            stdin: String::new(),
        }
    }
}

/// A submitted job. Lives only for the duration of one execute call.
#[derive(Debug, Clone)]
pub struct ExecutionJob {
    pub token: String,
    pub language_id: u32,
    pub submitted_at: Instant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobStatus {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

/// Result fields of `GET /submissions/{token}`. Text fields may or may not be
/// base64-encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobResult {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl JobResult {
    /// Anything past "processing" will not change any more.
    pub fn is_terminal(&self) -> bool {
        self.status.id > STATUS_PROCESSING
    }
}

/// One poll response: the typed view plus the payload as received.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub result: JobResult,
    pub raw: serde_json::Value,
}

impl JobSnapshot {
    pub fn from_raw(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let result = serde_json::from_value(raw.clone())?;
        Ok(Self { result, raw })
    }
}

/// One entry of `GET /languages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogLanguage {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}
