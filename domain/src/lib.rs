//! Domain layer for kubegate
//!
//! This crate contains the tool model: the catalog of kubectl/helm tools,
//! argument validation, and the pure command builder. It performs no I/O
//! and has no dependencies on infrastructure or presentation concerns.

pub mod tool;
pub mod util;

pub use tool::{
    catalog::{CatalogError, ToolCatalog},
    command::{BuildError, BuildRule, BuiltInvocation, Token, build_invocation},
    entities::{FieldKind, FieldSpec, FieldValue, Program, ToolDescriptor},
    validation::{DefaultToolValidator, ToolValidator, ValidatedArguments, ValidationError},
    value_objects::{ErrorKind, ExecutionOutcome, ExecutionStatus, ToolResult},
};
