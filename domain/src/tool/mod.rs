//! Tool domain module
//!
//! Everything needed to turn a named call with JSON arguments into a
//! concrete `kubectl` / `helm` invocation, without performing any I/O.
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌─────────────────┐
//! │ ToolCatalog  │──▶│ ValidatedArguments │──▶│ BuiltInvocation │
//! │ (lookup)     │   │ (validator)        │   │ (build rule)    │
//! └──────────────┘   └────────────────────┘   └────────┬────────┘
//!                                                      │ executor
//!                          ┌────────────┐   ┌──────────▼───────┐
//!                          │ ToolResult │◀──│ ExecutionOutcome │
//!                          └────────────┘   └──────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDescriptor`]: name, argument schema, build rule, fallback text
//! - [`ToolCatalog`]: immutable registry, checked at construction
//! - [`ToolValidator`]: checks and coerces raw arguments
//! - [`BuildRule`]: declarative token list producing an argument vector
//! - [`ToolResult`]: what the caller receives
//!
//! The process executor lives behind a port in the application layer; the
//! domain only describes what to run.

pub mod catalog;
pub mod command;
pub mod entities;
pub mod template;
pub mod validation;
pub mod value_objects;

pub use catalog::{CatalogError, ToolCatalog};
pub use command::{BuildError, BuildRule, BuiltInvocation, Token, build_invocation};
pub use entities::{FieldKind, FieldSpec, FieldValue, Program, ToolDescriptor};
pub use validation::{DefaultToolValidator, ToolValidator, ValidatedArguments, ValidationError};
pub use value_objects::{ErrorKind, ExecutionOutcome, ExecutionStatus, ToolResult};
