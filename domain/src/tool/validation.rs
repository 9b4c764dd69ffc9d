//! Argument validation
//!
//! Checks a raw JSON argument map against a [`ToolDescriptor`]'s fields and
//! produces [`ValidatedArguments`], the only argument shape the command
//! builder accepts.
//!
//! Policy:
//! - fields are visited in declaration order; the first failure is reported
//! - `null` and `""` count as absent; for a required field so does a
//!   whitespace-only string
//! - numbers may arrive as numeric strings, booleans as `"true"` / `"false"`
//! - keys not declared by the tool are ignored
//! - no range or cross-field checks

use super::entities::{FieldKind, FieldSpec, FieldValue, ToolDescriptor};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failure. Always detected before any process is spawned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required argument '{field}' for tool '{tool}'")]
    MissingField { tool: String, field: String },

    #[error("Argument '{field}' must be a {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },

    #[error("Arguments for tool '{tool}' must be an object, got {found}")]
    NotAnObject { tool: String, found: &'static str },
}

/// Arguments confirmed against a tool's schema, with defaults applied.
///
/// Only constructible inside this crate, so the command builder never sees
/// raw caller data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArguments {
    values: BTreeMap<String, FieldValue>,
}

impl ValidatedArguments {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Validator for raw tool arguments
pub trait ToolValidator {
    fn validate(
        &self,
        descriptor: &ToolDescriptor,
        raw: &Value,
    ) -> Result<ValidatedArguments, ValidationError>;
}

/// Default implementation of [`ToolValidator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        descriptor: &ToolDescriptor,
        raw: &Value,
    ) -> Result<ValidatedArguments, ValidationError> {
        let empty = serde_json::Map::new();
        let map = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ValidationError::NotAnObject {
                    tool: descriptor.name.clone(),
                    found: json_type_name(other),
                });
            }
        };

        let mut validated = ValidatedArguments::default();
        for field in &descriptor.fields {
            match supplied(field, map.get(&field.name)) {
                Some(value) => {
                    validated.insert(field.name.clone(), coerce(field, value)?);
                }
                None if field.required => {
                    return Err(ValidationError::MissingField {
                        tool: descriptor.name.clone(),
                        field: field.name.clone(),
                    });
                }
                None => {
                    if let Some(default) = &field.default {
                        validated.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(validated)
    }
}

/// The caller's value, or `None` when it counts as not supplied.
fn supplied<'a>(field: &FieldSpec, value: Option<&'a Value>) -> Option<&'a Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() || (field.required && s.trim().is_empty()) => None,
        Some(v) => Some(v),
    }
}

fn coerce(field: &FieldSpec, value: &Value) -> Result<FieldValue, ValidationError> {
    let coerced = match (field.kind, value) {
        (FieldKind::String, Value::String(s)) => Some(FieldValue::String(s.clone())),
        (FieldKind::Number, Value::Number(n)) => Some(FieldValue::Number(n.clone())),
        (FieldKind::Number, Value::String(s)) => parse_number(s).map(FieldValue::Number),
        (FieldKind::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
        (FieldKind::Boolean, Value::String(s)) => match s.as_str() {
            "true" => Some(FieldValue::Boolean(true)),
            "false" => Some(FieldValue::Boolean(false)),
            _ => None,
        },
        _ => None,
    };

    coerced.ok_or_else(|| ValidationError::TypeMismatch {
        field: field.name.clone(),
        expected: field.kind,
        found: json_type_name(value),
    })
}

fn parse_number(s: &str) -> Option<serde_json::Number> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(serde_json::Number::from(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .and_then(serde_json::Number::from_f64)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::Program;
    use serde_json::json;

    fn get_logs() -> ToolDescriptor {
        ToolDescriptor::new("get-logs", "Get logs", Program::Kubectl)
            .with_field(FieldSpec::required("pod", FieldKind::String, "Pod"))
            .with_field(FieldSpec::optional("namespace", FieldKind::String, "Namespace"))
            .with_field(FieldSpec::optional("lines", FieldKind::Number, "Lines").with_default(100))
            .with_field(
                FieldSpec::optional("follow", FieldKind::Boolean, "Follow")
                    .with_default(false),
            )
    }

    #[test]
    fn test_defaults_substituted() {
        let args = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1"}))
            .unwrap();

        assert_eq!(args.get_str("pod"), Some("web-1"));
        assert_eq!(args.get("lines"), Some(&FieldValue::from(100)));
        assert_eq!(args.get_bool("follow"), Some(false));
        assert!(!args.contains("namespace"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = DefaultToolValidator
            .validate(&get_logs(), &json!({"namespace": "prod"}))
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingField {
                tool: "get-logs".to_string(),
                field: "pod".to_string(),
            }
        );
        assert!(err.to_string().contains("Missing required argument 'pod'"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1", "follow": "yes"}))
            .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::TypeMismatch {
                ref field,
                expected: FieldKind::Boolean,
                found: "string"
            } if field == "follow"
        ));
    }

    #[test]
    fn test_string_field_rejects_number() {
        let err = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": 42}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { found: "number", .. }));
    }

    #[test]
    fn test_coercion_from_strings() {
        let args = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1", "lines": "25", "follow": "true"}))
            .unwrap();

        assert_eq!(args.get("lines"), Some(&FieldValue::from(25)));
        assert_eq!(args.get_bool("follow"), Some(true));
    }

    #[test]
    fn test_non_numeric_string_for_number() {
        let err = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1", "lines": "many"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { expected: FieldKind::Number, .. }));
    }

    #[test]
    fn test_null_and_empty_string_count_as_absent() {
        let args = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1", "namespace": "", "lines": null}))
            .unwrap();

        assert!(!args.contains("namespace"));
        assert_eq!(args.get("lines"), Some(&FieldValue::from(100)));
    }

    #[test]
    fn test_blank_required_string_is_missing() {
        for blank in ["", "   "] {
            let err = DefaultToolValidator
                .validate(&get_logs(), &json!({"pod": blank}))
                .unwrap_err();
            assert_eq!(
                err,
                ValidationError::MissingField {
                    tool: "get-logs".to_string(),
                    field: "pod".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let args = DefaultToolValidator
            .validate(&get_logs(), &json!({"pod": "web-1", "colour": "blue"}))
            .unwrap();
        assert!(!args.contains("colour"));
    }

    #[test]
    fn test_null_arguments_treated_as_empty_object() {
        let tool = ToolDescriptor::new("list-nodes", "List nodes", Program::Kubectl);
        let args = DefaultToolValidator.validate(&tool, &Value::Null).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_array_arguments_rejected() {
        let err = DefaultToolValidator
            .validate(&get_logs(), &json!(["web-1"]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAnObject {
                tool: "get-logs".to_string(),
                found: "array",
            }
        );
    }

    #[test]
    fn test_first_missing_field_in_declaration_order() {
        let tool = ToolDescriptor::new("set-image", "Set image", Program::Kubectl)
            .with_field(FieldSpec::required("deployment", FieldKind::String, "Deployment"))
            .with_field(FieldSpec::required("container", FieldKind::String, "Container"))
            .with_field(FieldSpec::required("image", FieldKind::String, "Image"));

        let err = DefaultToolValidator
            .validate(&tool, &json!({"image": "nginx:1.27"}))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingField { ref field, .. } if field == "deployment"
        ));
    }
}
