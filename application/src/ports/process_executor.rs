//! Process executor port
//!
//! Defines how the application layer runs a [`BuiltInvocation`]. The only
//! side-effecting seam in the dispatch pipeline; adapters live in the
//! infrastructure layer.

use async_trait::async_trait;
use kubegate_domain::tool::{command::BuiltInvocation, value_objects::ExecutionOutcome};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The process could not be run at all.
///
/// A process that starts and then exits non-zero is *not* an error here; it
/// is an [`ExecutionOutcome`] with a failure status.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open output file {}: {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Port for running external programs
#[async_trait]
pub trait ProcessExecutorPort: Send + Sync {
    /// Run the invocation to completion or until `timeout` elapses.
    ///
    /// On timeout the child is killed and the outcome carries whatever
    /// output was captured up to that point.
    async fn execute(
        &self,
        invocation: &BuiltInvocation,
        timeout: Duration,
    ) -> Result<ExecutionOutcome, ExecutorError>;
}
