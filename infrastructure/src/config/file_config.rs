//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into the types
//! the rest of the system consumes ([`ExecutionPolicy`], [`ExecutorSettings`])
//! happens here so callers never see raw seconds or empty-string sentinels.

use crate::tools::executor::{DEFAULT_MAX_OUTPUT_BYTES, ExecutorSettings};
use kubegate_application::config::ExecutionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `[programs]`: which binaries to run and which cluster they talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProgramsConfig {
    /// kubectl binary (path or name on PATH)
    pub kubectl: String,
    /// helm binary (path or name on PATH)
    pub helm: String,
    /// Exported as KUBECONFIG when non-empty
    pub kubeconfig: Option<String>,
    /// Context passed to every call when non-empty
    pub context: Option<String>,
}

impl Default for FileProgramsConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            helm: "helm".to_string(),
            kubeconfig: None,
            context: None,
        }
    }
}

/// `[executor]`: limits applied to every child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    pub default_timeout_secs: u64,
    /// Follow logs, port-forward and wait
    pub streaming_timeout_secs: u64,
    pub max_concurrent: usize,
    /// Per stream
    pub max_output_bytes: usize,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        let policy = ExecutionPolicy::default();
        Self {
            default_timeout_secs: policy.default_timeout.as_secs(),
            streaming_timeout_secs: policy.streaming_timeout.as_secs(),
            max_concurrent: policy.max_concurrent,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub programs: FileProgramsConfig,
    pub executor: FileExecutorConfig,
}

impl FileConfig {
    /// Reject values that would make every call fail or hang.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let executor = &self.executor;
        if executor.default_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "executor.default_timeout_secs cannot be 0".to_string(),
            ));
        }
        if executor.streaming_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "executor.streaming_timeout_secs cannot be 0".to_string(),
            ));
        }
        if executor.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "executor.max_concurrent cannot be 0".to_string(),
            ));
        }
        if executor.max_output_bytes == 0 {
            return Err(ConfigError::Invalid(
                "executor.max_output_bytes cannot be 0".to_string(),
            ));
        }
        if self.programs.kubectl.trim().is_empty() || self.programs.helm.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "programs.kubectl and programs.helm cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn execution_policy(&self) -> ExecutionPolicy {
        ExecutionPolicy::default()
            .with_default_timeout(Duration::from_secs(self.executor.default_timeout_secs))
            .with_streaming_timeout(Duration::from_secs(self.executor.streaming_timeout_secs))
            .with_max_concurrent(self.executor.max_concurrent)
    }

    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            kubectl: self.programs.kubectl.clone(),
            helm: self.programs.helm.clone(),
            kubeconfig: non_empty(&self.programs.kubeconfig).map(PathBuf::from),
            context: non_empty(&self.programs.context).map(str::to_string),
            max_output_bytes: self.executor.max_output_bytes,
            ..ExecutorSettings::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
