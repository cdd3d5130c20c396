//! Remote code execution through the judge service.
//!
//! The judge is an asynchronous job queue: a submission returns a token, and
//! the token is polled until the job reaches a terminal status. This module
//! resolves language labels, drives the submit/poll cycle and turns the
//! result fields into one display string.

pub mod client;
pub mod decoder;
pub mod languages;
pub mod orchestrator;
pub mod types;

pub use client::{HttpJudgeClient, JudgeClient};
pub use decoder::{decode_field, prioritize_output, NO_OUTPUT};
pub use languages::{resolve_language, COMMON_LANGUAGES};
pub use orchestrator::{ExecutionOrchestrator, ExecutionOutcome, ExecutionRequest, PollPolicy};
pub use types::{CatalogLanguage, ExecutionJob, JobResult, JobSnapshot, JobStatus, Submission};
