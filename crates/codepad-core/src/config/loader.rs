//! Configuration loader for YAML files and environment resolution
//!
//! The YAML file is optional. API keys are resolved from the environment after
//! parsing, and their absence only degrades the endpoints that need them.

use crate::config::types::*;
use crate::errors::CodepadError;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use tokio::fs;

pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const JUDGE_KEY_ENV: &str = "JUDGE0_API_KEY";
pub const JUDGE_KEY_FALLBACK_ENV: &str = "RAPIDAPI_KEY";
pub const PORT_ENV: &str = "PORT";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub async fn from_path_or_default<P: AsRef<Path>>(path: P) -> Result<CodepadConfig, CodepadError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            log::warn!(
                "Config file {} not found, using defaults and environment",
                path.display()
            );
            Self::from_str("{}")
        }
    }

    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<CodepadConfig, CodepadError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            CodepadError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<CodepadConfig, CodepadError> {
        let mut config: CodepadConfig = if content.trim().is_empty() {
            CodepadConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                CodepadError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve_environment(&mut config)?;
        config.validate()?;
        Self::report_degraded_services(&config);

        Ok(config)
    }

    /// Resolve environment variables in the configuration
    fn resolve_environment(config: &mut CodepadConfig) -> Result<(), CodepadError> {
        Self::resolve_auth(&mut config.llm.auth, &[GEMINI_KEY_ENV]);
        Self::resolve_auth(&mut config.judge.auth, &[JUDGE_KEY_ENV, JUDGE_KEY_FALLBACK_ENV]);

        if let Ok(port) = env::var(PORT_ENV) {
            let port: u16 = port.trim().parse().map_err(|e| {
                CodepadError::ConfigError(format!("Invalid {} value '{}': {}", PORT_ENV, port, e))
            })?;
            let mut addr: SocketAddr = config.server.bind_addr.parse().map_err(|e| {
                CodepadError::ConfigError(format!(
                    "Invalid bind address '{}': {}",
                    config.server.bind_addr, e
                ))
            })?;
            addr.set_port(port);
            config.server.bind_addr = addr.to_string();
        }

        Ok(())
    }

    /// Fill an API key from its configured variable, or from the well-known
    /// variables when none is configured. Inline keys win.
    fn resolve_auth(auth: &mut ApiAuth, defaults: &[&str]) {
        if auth.api_key.as_deref().is_some_and(|key| !key.is_empty()) {
            return;
        }

        let candidates: Vec<&str> = match &auth.api_key_env {
            Some(env_var) => vec![env_var.as_str()],
            None => defaults.to_vec(),
        };

        auth.api_key = candidates
            .into_iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty());
    }

    fn report_degraded_services(config: &CodepadConfig) {
        if config.llm.auth.api_key.is_none() {
            log::warn!("No Gemini API key configured; /explain and /improve will fail until one is provided");
        }
        if config.judge.auth.api_key.is_none() {
            log::warn!("No judge API key configured; /execute will fail until one is provided");
        }
    }
}
