//! Tool catalog: the immutable registry of every exposed tool
//!
//! Built once at startup from a fixed table and shared read-only afterwards.
//! Construction checks the table for internal consistency, so a malformed
//! entry stops the process before it serves a single call.

use super::command::{FieldUse, use_allowed};
use super::entities::ToolDescriptor;
use super::template::placeholders;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Defect in the tool table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Tool '{tool}' declares field '{field}' more than once")]
    DuplicateField { tool: String, field: String },

    #[error("Tool '{tool}': required field '{field}' must not have a default")]
    RequiredWithDefault { tool: String, field: String },

    #[error("Tool '{tool}': default for '{field}' does not match its kind")]
    DefaultKindMismatch { tool: String, field: String },

    #[error("Tool '{tool}' references undeclared field '{field}'")]
    UnknownField { tool: String, field: String },

    #[error("Tool '{tool}': field '{field}' is used as a switch but is not a boolean")]
    SwitchNotBoolean { tool: String, field: String },
}

/// Name-indexed, order-preserving set of tools.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (i, tool) in tools.iter().enumerate() {
            check_descriptor(tool)?;
            if index.insert(tool.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateTool(tool.name.clone()));
            }
        }
        Ok(Self { tools, index })
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// All tools in declaration order.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn check_descriptor(tool: &ToolDescriptor) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for field in &tool.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CatalogError::DuplicateField {
                tool: tool.name.clone(),
                field: field.name.clone(),
            });
        }
        if let Some(default) = &field.default {
            if field.required {
                return Err(CatalogError::RequiredWithDefault {
                    tool: tool.name.clone(),
                    field: field.name.clone(),
                });
            }
            if default.kind() != field.kind {
                return Err(CatalogError::DefaultKindMismatch {
                    tool: tool.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
    }

    let fallback_refs = placeholders(&tool.empty_output)
        .into_iter()
        .map(|name| (name, FieldUse::Template));

    let streaming_ref = tool
        .streaming_switch
        .as_deref()
        .map(|name| (name, FieldUse::Switch));

    for (name, usage) in tool
        .rule
        .field_refs()
        .into_iter()
        .chain(fallback_refs)
        .chain(streaming_ref)
    {
        let Some(field) = tool.field(name) else {
            return Err(CatalogError::UnknownField {
                tool: tool.name.clone(),
                field: name.to_string(),
            });
        };
        if !use_allowed(field.kind, usage) {
            return Err(CatalogError::SwitchNotBoolean {
                tool: tool.name.clone(),
                field: name.to_string(),
            });
        }
    }

    Ok(())
}
