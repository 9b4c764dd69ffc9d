//! Execution policy: per-call limits applied by the dispatcher.
//!
//! [`ExecutionPolicy`] groups the static parameters that bound a tool call:
//! how long a command may run and how many may run at once. These are
//! application-layer concerns; the infrastructure config loader fills them in.

use kubegate_domain::tool::{entities::ToolDescriptor, validation::ValidatedArguments};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call execution limits.
///
/// | Tool kind | Timeout |
/// |-----------|---------|
/// | regular (list, describe, apply, ...) | `default_timeout` |
/// | long-running (follow logs, port-forward, wait) | `streaming_timeout` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPolicy {
    /// Wall-clock limit for regular tools.
    pub default_timeout: Duration,
    /// Wall-clock limit for tools that stream until stopped.
    pub streaming_timeout: Duration,
    /// Maximum number of child processes running at once.
    pub max_concurrent: usize,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(300),
            streaming_timeout: Duration::from_secs(300),
            max_concurrent: 16,
        }
    }
}

impl ExecutionPolicy {
    // ==================== Builder Methods ====================

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_streaming_timeout(mut self, timeout: Duration) -> Self {
        self.streaming_timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Timeout applicable to a given call.
    pub fn timeout_for(&self, tool: &ToolDescriptor, args: &ValidatedArguments) -> Duration {
        if tool.is_long_running(args) {
            self.streaming_timeout
        } else {
            self.default_timeout
        }
    }
}
