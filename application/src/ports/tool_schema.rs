//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain catalog) from "how they are
//! described on the wire" (infrastructure). The MCP `tools/list` response
//! needs a JSON Schema object per tool; the conversion lives behind this port.

use kubegate_domain::tool::entities::ToolDescriptor;

/// Port for converting tool descriptors to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Input schema (`type: object`) for a single tool.
    fn input_schema(&self, tool: &ToolDescriptor) -> serde_json::Value;
}
