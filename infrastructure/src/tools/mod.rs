//! Tool adapters
//!
//! - `catalog`: the built-in kubectl / helm tool table
//! - `executor`: runs built invocations as child processes
//! - `schema`: publishes each tool's argument schema as JSON Schema
//! - `discovery`: checks the configured programs exist

pub mod catalog;
pub mod discovery;
pub mod executor;
pub mod schema;

mod helm;
mod kubectl;

pub use catalog::{builtin_tools, default_catalog};
pub use discovery::{ProgramLocation, locate_programs};
pub use executor::{ExecutorSettings, TokioProcessExecutor};
pub use schema::JsonSchemaToolConverter;
