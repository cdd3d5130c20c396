//! Configuration type definitions
//!
//! Every section is optional in the YAML file; an empty document yields a
//! working configuration apart from API keys, which are normally supplied
//! through the environment.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::CodepadError;
use crate::judge::PollPolicy;
use codepad_http::{RateLimitConfig, ServerConfig};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_JUDGE_BASE_URL: &str = "https://judge0-ce.p.rapidapi.com";
pub const DEFAULT_JUDGE_HOST: &str = "judge0-ce.p.rapidapi.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodepadConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// API key, given inline or through an environment variable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiAuth {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub auth: ApiAuth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_judge_base_url")]
    pub base_url: String,
    #[serde(default = "default_judge_host")]
    pub host_header: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    #[serde(default)]
    pub auth: ApiAuth,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origins: None,
            max_body_size: default_max_body_size(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            auth: ApiAuth::default(),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_judge_base_url(),
            host_header: default_judge_host(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_ms: default_poll_timeout_ms(),
            auth: ApiAuth::default(),
        }
    }
}

impl JudgeConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_millis(self.poll_timeout_ms),
        }
    }
}

impl CodepadConfig {
    pub fn validate(&self) -> Result<(), CodepadError> {
        self.server.bind_addr.parse::<SocketAddr>().map_err(|e| {
            CodepadError::ConfigError(format!(
                "Invalid bind address '{}': {}",
                self.server.bind_addr, e
            ))
        })?;

        let rate_limit = &self.server.rate_limit;
        if rate_limit.enabled && (rate_limit.max_requests == 0 || rate_limit.window_secs == 0) {
            return Err(CodepadError::ConfigError(
                "rate_limit.max_requests and rate_limit.window_secs must be greater than zero"
                    .to_string(),
            ));
        }

        if self.judge.poll_interval_ms == 0 {
            return Err(CodepadError::ConfigError(
                "judge.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.judge.poll_timeout_ms < self.judge.poll_interval_ms {
            return Err(CodepadError::ConfigError(format!(
                "judge.poll_timeout_ms ({}) must not be smaller than judge.poll_interval_ms ({})",
                self.judge.poll_timeout_ms, self.judge.poll_interval_ms
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(CodepadError::ConfigError("llm.model must not be empty".to_string()));
        }

        Ok(())
    }

    /// Build the HTTP server configuration from the `server` section.
    pub fn to_server_config(&self) -> Result<ServerConfig, CodepadError> {
        let bind_addr: SocketAddr = self.server.bind_addr.parse().map_err(|e| {
            CodepadError::ConfigError(format!(
                "Invalid bind address '{}': {}",
                self.server.bind_addr, e
            ))
        })?;

        let rate_limit = &self.server.rate_limit;
        let rate_limit = rate_limit.enabled.then(|| RateLimitConfig {
            max_requests: rate_limit.max_requests,
            window: Duration::from_secs(rate_limit.window_secs),
        });

        let mut config = ServerConfig::default()
            .with_bind_addr(bind_addr)
            .with_max_body_size(self.server.max_body_size)
            .with_rate_limit(rate_limit);
        if let Some(origins) = &self.server.cors_origins {
            config = config.with_cors_origins(origins.clone());
        }
        Ok(config)
    }
}

fn default_true() -> bool { true }
fn default_bind_addr() -> String { "0.0.0.0:3000".to_string() }
fn default_max_body_size() -> usize { 1024 * 1024 }
fn default_max_requests() -> u32 { 100 }
fn default_window_secs() -> u64 { 15 * 60 }
fn default_llm_model() -> String { "gemini-1.5-flash".to_string() }
fn default_llm_base_url() -> String { DEFAULT_GEMINI_BASE_URL.to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_output_tokens() -> u32 { 2048 }
fn default_judge_base_url() -> String { DEFAULT_JUDGE_BASE_URL.to_string() }
fn default_judge_host() -> String { DEFAULT_JUDGE_HOST.to_string() }
fn default_poll_interval_ms() -> u64 { 800 }
fn default_poll_timeout_ms() -> u64 { 20_000 }
