//! List tools use case
//!
//! Read-only projection of the catalog for `tools/list`. Pure: calling it
//! twice yields identical output.

use crate::ports::tool_schema::ToolSchemaPort;
use kubegate_domain::tool::catalog::ToolCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Published description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolListing {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

pub struct ListToolsUseCase {
    catalog: Arc<ToolCatalog>,
    schema: Arc<dyn ToolSchemaPort>,
}

impl ListToolsUseCase {
    pub fn new(catalog: Arc<ToolCatalog>, schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self { catalog, schema }
    }

    /// Every tool in catalog order.
    pub fn describe_all(&self) -> Vec<ToolListing> {
        self.catalog
            .list()
            .iter()
            .map(|tool| ToolListing {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: self.schema.input_schema(tool),
            })
            .collect()
    }
}
