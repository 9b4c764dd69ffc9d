//! helm tool table

use super::kubectl::{namespace, ns};
use kubegate_domain::tool::command::{arg, lit, opt, stdin};
use kubegate_domain::tool::entities::{FieldKind, FieldSpec, Program, ToolDescriptor};

const RELEASE_NS: &str =
    "The namespace of the release (optional, defaults to current context namespace)";

fn helm(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, description, Program::Helm)
}

fn release_name() -> FieldSpec {
    FieldSpec::required("name", FieldKind::String, "The name of the release")
}

fn chart() -> FieldSpec {
    FieldSpec::required("chart", FieldKind::String, "The chart reference (repo/chart or path)")
}

fn values() -> FieldSpec {
    FieldSpec::optional("values", FieldKind::String, "Values to override (YAML string)")
}

pub(super) fn releases() -> Vec<ToolDescriptor> {
    vec![
        helm("helm-list", "List Helm releases")
            .with_field(namespace(
                "The namespace to list releases from (optional, defaults to all namespaces)",
            ))
            .with_tokens([lit("list"), ns()])
            .with_fallback("No Helm releases found"),
        helm("helm-status", "Get the status of a Helm release")
            .with_field(FieldSpec::required(
                "release",
                FieldKind::String,
                "The name of the Helm release",
            ))
            .with_field(namespace(RELEASE_NS))
            .with_tokens([lit("status"), arg("{release}"), ns()])
            .with_fallback("Unable to get Helm release status"),
    ]
}

/// Values are streamed to helm on stdin (`-f -`) rather than through a
/// temporary file.
pub(super) fn lifecycle() -> Vec<ToolDescriptor> {
    vec![
        helm("helm-install", "Install a Helm chart")
            .with_field(release_name())
            .with_field(chart())
            .with_field(namespace(
                "The namespace to install into (optional, defaults to current context namespace)",
            ))
            .with_field(values())
            .with_field(FieldSpec::optional(
                "version",
                FieldKind::String,
                "Chart version to install",
            ))
            .with_tokens([
                lit("install"),
                arg("{name}"),
                arg("{chart}"),
                ns(),
                opt("--version", "{version}"),
                stdin("-f", "values"),
            ])
            .with_fallback("Helm chart {chart} installed as {name}"),
        helm("helm-upgrade", "Upgrade a Helm release")
            .with_field(release_name())
            .with_field(chart())
            .with_field(namespace(RELEASE_NS))
            .with_field(values())
            .with_tokens([
                lit("upgrade"),
                arg("{name}"),
                arg("{chart}"),
                ns(),
                stdin("-f", "values"),
            ])
            .with_fallback("Helm release {name} upgraded"),
        helm("helm-uninstall", "Uninstall a Helm release")
            .with_field(release_name())
            .with_field(namespace(RELEASE_NS))
            .with_tokens([lit("uninstall"), arg("{name}"), ns()])
            .with_fallback("Helm release {name} uninstalled"),
    ]
}
