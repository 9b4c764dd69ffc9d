//! Command building: validated arguments to an argument vector
//!
//! Every tool carries one [`BuildRule`]: the program to run and an ordered
//! list of [`Token`]s. Building walks the tokens once and emits discrete
//! argument strings. Nothing is ever handed to a shell, so a user value can
//! only ever occupy the argument slot its token gives it.
//!
//! A positional argument that starts with a caller value is refused when that
//! value starts with `-`: kubectl and helm would parse it as a flag
//! (`delete pods --all`). Option values are safe, the flag consumes them.
//!
//! ```text
//! list-pods {namespace: "prod"}
//!   tokens: lit("get") lit("pods") opt("-n", "{namespace}") lit("-o") lit("wide")
//!   argv:   ["get", "pods", "-n", "prod", "-o", "wide"]
//! ```

use super::entities::{FieldKind, Program, ToolDescriptor};
use super::template::{placeholders, render};
use super::validation::ValidatedArguments;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One step of a build rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Fixed argument, emitted verbatim.
    Lit(String),
    /// Templated argument, emitted only when every referenced field is set.
    Arg(String),
    /// `flag value`, emitted only when the value template renders.
    Opt { flag: String, value: String },
    /// Bare flag, emitted when the boolean field is `true`.
    Switch { flag: String, field: String },
    /// `flag value` when the value renders, otherwise the fallback argument.
    OptOr {
        flag: String,
        value: String,
        otherwise: String,
    },
    /// `--` followed by the field split into words, when the field is set.
    Argv { field: String },
    /// `flag -` with the field's text written to the child's stdin.
    Stdin { flag: String, field: String },
    /// Redirects the child's stdout to the file named by the field.
    StdoutFile { field: String },
}

pub fn lit(value: impl Into<String>) -> Token {
    Token::Lit(value.into())
}

pub fn arg(template: impl Into<String>) -> Token {
    Token::Arg(template.into())
}

pub fn opt(flag: impl Into<String>, value: impl Into<String>) -> Token {
    Token::Opt {
        flag: flag.into(),
        value: value.into(),
    }
}

pub fn switch(flag: impl Into<String>, field: impl Into<String>) -> Token {
    Token::Switch {
        flag: flag.into(),
        field: field.into(),
    }
}

pub fn opt_or(
    flag: impl Into<String>,
    value: impl Into<String>,
    otherwise: impl Into<String>,
) -> Token {
    Token::OptOr {
        flag: flag.into(),
        value: value.into(),
        otherwise: otherwise.into(),
    }
}

pub fn argv(field: impl Into<String>) -> Token {
    Token::Argv {
        field: field.into(),
    }
}

pub fn stdin(flag: impl Into<String>, field: impl Into<String>) -> Token {
    Token::Stdin {
        flag: flag.into(),
        field: field.into(),
    }
}

pub fn stdout_file(field: impl Into<String>) -> Token {
    Token::StdoutFile {
        field: field.into(),
    }
}

/// How a field is referenced by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUse {
    /// Rendered into a template
    Template,
    /// Toggles a switch; must be boolean
    Switch,
    /// Used verbatim as a whole value (command vector, stdin, file path)
    Whole,
}

/// Program plus token list for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRule {
    pub program: Program,
    pub tokens: Vec<Token>,
}

impl BuildRule {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            tokens: Vec::new(),
        }
    }

    /// Every field reference made by the tokens, in token order.
    pub fn field_refs(&self) -> Vec<(&str, FieldUse)> {
        let mut refs = Vec::new();
        for token in &self.tokens {
            match token {
                Token::Lit(_) => {}
                Token::Arg(t) => {
                    refs.extend(placeholders(t).into_iter().map(|n| (n, FieldUse::Template)));
                }
                Token::Opt { value, .. } | Token::OptOr { value, .. } => {
                    refs.extend(placeholders(value).into_iter().map(|n| (n, FieldUse::Template)));
                }
                Token::Switch { field, .. } => refs.push((field.as_str(), FieldUse::Switch)),
                Token::Argv { field }
                | Token::Stdin { field, .. }
                | Token::StdoutFile { field } => refs.push((field.as_str(), FieldUse::Whole)),
            }
        }
        refs
    }

    pub fn build(&self, args: &ValidatedArguments) -> Result<BuiltInvocation, BuildError> {
        let mut invocation = BuiltInvocation::new(self.program);

        for token in &self.tokens {
            match token {
                Token::Lit(value) => invocation.args.push(value.clone()),
                Token::Arg(template) => {
                    if let Some(value) = render(template, args) {
                        invocation.args.push(positional(template, value)?);
                    }
                }
                Token::Opt { flag, value } => {
                    if let Some(value) = render(value, args) {
                        invocation.args.push(flag.clone());
                        invocation.args.push(value);
                    }
                }
                Token::Switch { flag, field } => {
                    if args.get_bool(field) == Some(true) {
                        invocation.args.push(flag.clone());
                    }
                }
                Token::OptOr {
                    flag,
                    value,
                    otherwise,
                } => match render(value, args) {
                    Some(value) => {
                        invocation.args.push(flag.clone());
                        invocation.args.push(value);
                    }
                    None => invocation.args.push(otherwise.clone()),
                },
                Token::Argv { field } => {
                    if let Some(value) = args.get(field) {
                        let words = split_command(field, &value.to_string())?;
                        invocation.args.push("--".to_string());
                        invocation.args.extend(words);
                    }
                }
                Token::Stdin { flag, field } => {
                    if let Some(value) = args.get(field) {
                        invocation.args.push(flag.clone());
                        invocation.args.push("-".to_string());
                        invocation.stdin = Some(value.to_string());
                    }
                }
                Token::StdoutFile { field } => {
                    if let Some(value) = args.get(field) {
                        invocation.stdout_file = Some(PathBuf::from(value.to_string()));
                    }
                }
            }
        }

        Ok(invocation)
    }
}

/// Refuse a rendered positional whose leading `-` came from a caller value.
fn positional(template: &str, value: String) -> Result<String, BuildError> {
    if value.starts_with('-') && !template.starts_with('-') {
        let field = placeholders(template).first().copied().unwrap_or(template);
        return Err(BuildError::FlagLikeValue {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Split a command string into words using POSIX-style quoting.
///
/// No expansion of any kind happens; `$HOME`, globs and `;` stay literal.
fn split_command(field: &str, command: &str) -> Result<Vec<String>, BuildError> {
    let words = shlex::split(command).ok_or_else(|| BuildError::MalformedCommand {
        field: field.to_string(),
        reason: "unbalanced quotes or trailing escape",
    })?;
    if words.is_empty() {
        return Err(BuildError::MalformedCommand {
            field: field.to_string(),
            reason: "command is empty",
        });
    }
    Ok(words)
}

/// Build the invocation for a tool from already-validated arguments.
pub fn build_invocation(
    descriptor: &ToolDescriptor,
    args: &ValidatedArguments,
) -> Result<BuiltInvocation, BuildError> {
    descriptor.rule.build(args)
}

/// Failure while turning validated arguments into an invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Argument '{field}' is not a valid command: {reason}")]
    MalformedCommand { field: String, reason: &'static str },

    #[error("Argument '{field}' must not start with '-', got '{value}'")]
    FlagLikeValue { field: String, value: String },
}

/// A fully-determined external process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInvocation {
    pub program: Program,
    /// Discrete argument tokens, never re-split
    pub args: Vec<String>,
    /// Payload written to the child's stdin, then closed
    pub stdin: Option<String>,
    /// File that receives the child's stdout instead of the capture buffer
    pub stdout_file: Option<PathBuf>,
}

impl BuiltInvocation {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            args: Vec::new(),
            stdin: None,
            stdout_file: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Shell-quoted rendering, for logs and error messages only.
impl fmt::Display for BuiltInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            match shlex::try_quote(arg) {
                Ok(quoted) => write!(f, " {}", quoted)?,
                Err(_) => write!(f, " {:?}", arg)?,
            }
        }
        if let Some(path) = &self.stdout_file {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}

/// Whether a field kind may be referenced the given way.
pub(crate) fn use_allowed(kind: FieldKind, usage: FieldUse) -> bool {
    match usage {
        FieldUse::Switch => kind == FieldKind::Boolean,
        FieldUse::Template | FieldUse::Whole => true,
    }
}
