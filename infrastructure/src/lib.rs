//! Infrastructure layer for kubegate
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the process executor, the schema converter, the
//! built-in tool table, and configuration file loading.

pub mod config;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use tools::{
    ExecutorSettings, JsonSchemaToolConverter, ProgramLocation, TokioProcessExecutor,
    default_catalog, locate_programs,
};
