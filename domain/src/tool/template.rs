//! `{field}` placeholder templates.
//!
//! Used for command-line tokens (each rendered template becomes exactly one
//! argument) and for the fallback text returned on empty output. A brace pair
//! whose content is not a plain identifier (e.g. a kubectl jsonpath such as
//! `{.spec.containers[*].resources}`) is kept verbatim.

use super::validation::ValidatedArguments;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Field(&'a str),
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        if is_placeholder_name(name) {
            if open > 0 {
                out.push(Segment::Text(&rest[..open]));
            }
            out.push(Segment::Field(name));
            rest = &after[close + 1..];
        } else {
            out.push(Segment::Text(&rest[..=open]));
            rest = after;
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// Field names referenced by a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    segments(template)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Field(name) => Some(name),
            Segment::Text(_) => None,
        })
        .collect()
}

/// Render a template, or `None` when any referenced field is unset.
pub fn render(template: &str, args: &ValidatedArguments) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Field(name) => out.push_str(&args.get(name)?.to_string()),
        }
    }
    Some(out)
}

/// Render a template, substituting unset fields with the empty string.
pub fn render_lenient(template: &str, args: &ValidatedArguments) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Field(name) => {
                if let Some(value) = args.get(name) {
                    out.push_str(&value.to_string());
                }
            }
        }
    }
    out
}
