//! Workflow configuration: attempt budget, batch width, attempt timeout
use crate::error::CopyflowError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_MAX_ATTEMPTS: &str = "COPYFLOW_MAX_ATTEMPTS";
pub const ENV_CHUNK_SIZE: &str = "COPYFLOW_CHUNK_SIZE";
pub const ENV_ATTEMPT_TIMEOUT_MS: &str = "COPYFLOW_ATTEMPT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Generation attempts allowed per request
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Requests processed concurrently by the batch coordinator
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Per-attempt generation timeout; `None` waits indefinitely
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: Option<u64>,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_chunk_size() -> usize {
    3
}

fn default_attempt_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            chunk_size: default_chunk_size(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
        }
    }
}

impl WorkflowConfig {
    /// Parse a YAML document; missing keys fall back to defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CopyflowError> {
        let config: WorkflowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `COPYFLOW_*` environment variables
    pub fn from_env() -> Result<Self, CopyflowError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Layer overrides from a key lookup on top of `self`.
    ///
    /// A timeout of `0` disables the per-attempt timeout.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, CopyflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CHUNK_SIZE) {
            self.chunk_size = parse_number(ENV_CHUNK_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ATTEMPT_TIMEOUT_MS) {
            let ms: u64 = parse_number(ENV_ATTEMPT_TIMEOUT_MS, &raw)?;
            self.attempt_timeout_ms = if ms == 0 { None } else { Some(ms) };
        }

        self.validate()?;
        Ok(self)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout_ms = timeout.map(|d| d.as_millis() as u64);
        self
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), CopyflowError> {
        if self.max_attempts == 0 {
            return Err(CopyflowError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(CopyflowError::ConfigError(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, CopyflowError> {
    raw.trim()
        .parse()
        .map_err(|_| CopyflowError::ConfigError(format!("{} is not a valid number: {:?}", key, raw)))
}
