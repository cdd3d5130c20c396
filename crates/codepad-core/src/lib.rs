//! Core of the Codepad code assistant backend.
//!
//! Codepad accepts a snippet of source code and a language label and offers
//! three things on it: an explanation and an improved rewrite, both produced
//! by a generative-language model, and remote execution through a judge
//! service.
//!
//! - **Language resolution**: labels map to judge language ids through a
//!   static table, falling back to the judge's own catalog
//! - **Execution orchestration**: submit, poll until terminal or timed out,
//!   decode the result streams
//! - **Requesters**: prompt construction and completion for explain/improve
//! - **Configuration**: YAML file plus environment-provided credentials

pub mod config;
pub mod errors;
pub mod handler;
pub mod judge;
pub mod llm;
pub mod requester;

pub use config::*;
pub use errors::CodepadError;
pub use handler::CodepadHandler;
pub use judge::{ExecutionOrchestrator, JudgeClient};
pub use llm::LLM;
pub use requester::Requester;

#[cfg(test)]
pub mod test_utils;
