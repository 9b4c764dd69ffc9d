//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the `inputSchema`
//! objects published by `tools/list`.

use kubegate_application::ports::tool_schema::ToolSchemaPort;
use kubegate_domain::tool::entities::ToolDescriptor;

/// Default implementation producing JSON Schema.
///
/// Field kinds map one to one onto JSON Schema types (`string`, `number`,
/// `boolean`). Declared defaults are published under `default`. The
/// `required` array is omitted when no field is required.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn input_schema(&self, tool: &ToolDescriptor) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in &tool.fields {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(field.kind.as_str()));
            prop.insert(
                "description".to_string(),
                serde_json::json!(field.description),
            );
            if let Some(default) = &field.default {
                prop.insert("default".to_string(), default.to_json());
            }
            properties.insert(field.name.clone(), serde_json::Value::Object(prop));

            if field.required {
                required.push(serde_json::json!(field.name));
            }
        }

        let mut schema = serde_json::Map::new();
        schema.insert("type".to_string(), serde_json::json!("object"));
        schema.insert("properties".to_string(), serde_json::Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), serde_json::Value::Array(required));
        }
        serde_json::Value::Object(schema)
    }
}
