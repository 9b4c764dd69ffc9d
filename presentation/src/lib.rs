//! Presentation layer for kubegate
//!
//! This crate contains the CLI definition and the MCP stdio server that
//! exposes the tool catalog to clients.

pub mod cli;
pub mod mcp;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use mcp::{McpServer, ServerError};
