//! Application-level configuration.
//!
//! - [`ExecutionPolicy`]: per-call timeouts and the concurrency cap

pub mod execution_policy;

pub use execution_policy::ExecutionPolicy;
