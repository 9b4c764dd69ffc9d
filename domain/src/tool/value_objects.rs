//! Tool domain value objects: execution outcomes and caller-facing results
//!
//! [`ExecutionOutcome`] is what the process executor observed.
//! [`ToolResult`] is what the caller gets back; it is the only type that
//! crosses into the protocol layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a process run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Exit code 0
    Success,
    /// Non-zero exit, or killed by a signal (`exit_code` is `None`)
    Failure { exit_code: Option<i32> },
    /// Wall-clock limit reached; the child was killed
    Timeout,
}

/// Captured result of running one [`BuiltInvocation`](super::command::BuiltInvocation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    /// Whether stdout or stderr hit the capture limit
    #[serde(default)]
    pub truncated: bool,
}

impl ExecutionOutcome {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Success,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 0,
            truncated: false,
        }
    }

    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failure { exit_code },
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 0,
            truncated: false,
        }
    }

    pub fn timeout(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Timeout,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_ms: 0,
            truncated: false,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            ExecutionStatus::Success => Some(0),
            ExecutionStatus::Failure { exit_code } => exit_code,
            ExecutionStatus::Timeout => None,
        }
    }
}

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unknown tool name
    Lookup,
    /// Arguments rejected before anything was spawned
    Validation,
    /// Spawn failure or non-zero exit
    Execution,
    /// Process exceeded its time limit
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lookup => "lookup",
            ErrorKind::Validation => "validation",
            ErrorKind::Execution => "execution",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing result of a tool call.
///
/// Failures are values, not errors: `content` starts with `"Error: "` and
/// `is_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
    /// Classification kept for logs and tests; never serialized
    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            error_kind: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl fmt::Display) -> Self {
        Self {
            content: format!("Error: {}", message),
            is_error: true,
            error_kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.is_error
    }
}
