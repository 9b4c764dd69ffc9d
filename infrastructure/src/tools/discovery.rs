//! Program discovery
//!
//! Checks at startup whether the configured kubectl / helm binaries can be
//! found. A missing program is not fatal: the server still starts and calls
//! needing it fail with an execution error.

use super::executor::ExecutorSettings;
use kubegate_domain::tool::entities::Program;
use std::path::PathBuf;

/// Result of looking up one configured program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLocation {
    pub program: Program,
    /// Configured binary name or path
    pub binary: String,
    /// Resolved location, `None` when not found
    pub resolved: Option<PathBuf>,
}

impl ProgramLocation {
    pub fn is_available(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Look up every program the executor may run.
pub fn locate_programs(settings: &ExecutorSettings) -> Vec<ProgramLocation> {
    [Program::Kubectl, Program::Helm]
        .into_iter()
        .map(|program| {
            let binary = settings.binary(program).to_string();
            let resolved = which::which(&binary).ok();
            ProgramLocation {
                program,
                binary,
                resolved,
            }
        })
        .collect()
}
