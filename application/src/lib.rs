//! Application layer for kubegate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionPolicy;
pub use ports::{
    process_executor::{ExecutorError, ProcessExecutorPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::dispatch_tool::{DispatchError, DispatchToolUseCase, InvocationRequest};
pub use use_cases::list_tools::{ListToolsUseCase, ToolListing};
