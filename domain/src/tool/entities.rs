//! Tool domain entities

use super::command::{BuildRule, Token};
use super::validation::ValidatedArguments;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External command-line program driven by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    /// The Kubernetes CLI
    Kubectl,
    /// The Helm package manager
    Helm,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Kubectl => "kubectl",
            Program::Helm => "helm",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primitive kind of a tool argument.
///
/// The names double as JSON Schema `type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed argument value, produced by validation or declared as a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Boolean(_) => FieldKind::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// JSON representation, used when publishing defaults in the schema.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Value::Number(n.clone()),
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }
}

/// Renders the value the way it appears on a command line.
///
/// Whole floats print without a fractional part (`3.0` → `3`) so that a
/// replica count or port sent as a float still yields a valid flag value.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{}", i)
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{}", u)
                } else {
                    match n.as_f64() {
                        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                            write!(f, "{}", v as i64)
                        }
                        Some(v) => write!(f, "{}", v),
                        None => write!(f, "{}", n),
                    }
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(serde_json::Number::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(serde_json::Number::from(value))
    }
}

/// Declaration of one tool argument.
///
/// A required field never carries a default; [`with_default`](Self::with_default)
/// makes the field optional.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub description: String,
}

impl FieldSpec {
    pub fn required(
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: description.into(),
        }
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }
}

/// One operation exposed to callers.
///
/// Carries the argument schema together with the declarative rule that turns
/// validated arguments into a command line, and the text returned when the
/// command succeeds without printing anything.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique tool name (e.g., "list-pods")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Argument specifications in declaration order
    pub fields: Vec<FieldSpec>,
    /// Program and token templates
    pub rule: BuildRule,
    /// Response text for empty stdout; may reference `{field}` placeholders
    pub empty_output: String,
    /// Whether stdout is trimmed before shaping
    pub trim_output: bool,
    /// Whether the command streams until stopped (port-forward, wait)
    pub long_running: bool,
    /// Boolean field that makes the command stream when true (`follow`)
    pub streaming_switch: Option<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
            rule: BuildRule::new(program),
            empty_output: String::new(),
            trim_output: false,
            long_running: false,
            streaming_switch: None,
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_tokens(mut self, tokens: impl IntoIterator<Item = Token>) -> Self {
        self.rule.tokens.extend(tokens);
        self
    }

    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.empty_output = text.into();
        self
    }

    pub fn trimmed(mut self) -> Self {
        self.trim_output = true;
        self
    }

    pub fn long_running(mut self) -> Self {
        self.long_running = true;
        self
    }

    pub fn long_running_when(mut self, field: impl Into<String>) -> Self {
        self.streaming_switch = Some(field.into());
        self
    }

    /// Whether this call, with these arguments, streams until stopped.
    pub fn is_long_running(&self, args: &ValidatedArguments) -> bool {
        self.long_running
            || self
                .streaming_switch
                .as_deref()
                .is_some_and(|field| args.get_bool(field) == Some(true))
    }

    pub fn program(&self) -> Program {
        self.rule.program
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}
