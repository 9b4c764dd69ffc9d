//! The built-in kubectl/helm tool table.

use super::{helm, kubectl};
use kubegate_domain::tool::catalog::{CatalogError, ToolCatalog};
use kubegate_domain::tool::entities::ToolDescriptor;

/// Every built-in tool, in published order.
pub fn builtin_tools() -> Vec<ToolDescriptor> {
    [
        kubectl::resource_listing(),
        kubectl::describe_resources(),
        kubectl::logs_and_debugging(),
        kubectl::networking(),
        kubectl::workloads(),
        kubectl::exec_and_files(),
        kubectl::config_and_secrets(),
        kubectl::cluster_information(),
        kubectl::contexts(),
        kubectl::create_and_delete(),
        kubectl::debugging(),
        helm::releases(),
        kubectl::rbac(),
        kubectl::network_policies(),
        kubectl::quotas_and_scaling(),
        kubectl::custom_resources(),
        kubectl::advanced_operations(),
        kubectl::diagnostics(),
        helm::lifecycle(),
        kubectl::argocd(),
        kubectl::istio(),
        kubectl::cluster_metrics(),
        kubectl::ephemeral_debugging(),
        kubectl::resource_analysis(),
        kubectl::backup(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Build the checked catalog of built-in tools.
pub fn default_catalog() -> Result<ToolCatalog, CatalogError> {
    ToolCatalog::new(builtin_tools())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kubegate_application::ports::process_executor::{ExecutorError, ProcessExecutorPort};
    use kubegate_application::use_cases::dispatch_tool::DispatchToolUseCase;
    use kubegate_domain::tool::command::{BuildError, BuiltInvocation, build_invocation};
    use kubegate_domain::tool::entities::{FieldKind, Program};
    use kubegate_domain::tool::validation::{DefaultToolValidator, ToolValidator, ValidationError};
    use kubegate_domain::tool::value_objects::{ErrorKind, ExecutionOutcome};
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn build(name: &str, raw: Value) -> BuiltInvocation {
        let catalog = default_catalog().unwrap();
        let tool = catalog.lookup(name).unwrap();
        let args = DefaultToolValidator.validate(tool, &raw).unwrap();
        build_invocation(tool, &args).unwrap()
    }

    fn argv(name: &str, raw: Value) -> Vec<String> {
        build(name, raw).args
    }

    #[test]
    fn test_catalog_is_consistent() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.len(), 81);
    }

    #[test]
    fn test_published_order() {
        let catalog = default_catalog().unwrap();
        let names: Vec<_> = catalog.names().collect();

        assert_eq!(names[0], "list-pods");
        assert_eq!(names[13], "describe-pod");
        assert_eq!(names.last(), Some(&"create-backup"));

        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(pos("run") < pos("helm-list"));
        assert!(pos("helm-status") < pos("list-serviceaccounts"));
        assert!(pos("drain-node") < pos("helm-install"));
        assert!(pos("helm-uninstall") < pos("argocd-list-apps"));
    }

    /// Sample value for a field of the given kind.
    fn sample(kind: FieldKind) -> Value {
        match kind {
            FieldKind::String => json!("x"),
            FieldKind::Number => json!(1),
            FieldKind::Boolean => json!(true),
        }
    }

    /// Arguments supplying every required field and nothing else.
    fn required_only(tool: &ToolDescriptor) -> serde_json::Map<String, Value> {
        tool.required_fields()
            .map(|field| (field.name.clone(), sample(field.kind)))
            .collect()
    }

    fn try_build(tool: &ToolDescriptor, raw: serde_json::Map<String, Value>) -> BuiltInvocation {
        let args = DefaultToolValidator
            .validate(tool, &Value::Object(raw))
            .unwrap_or_else(|e| panic!("{}: {}", tool.name, e));
        build_invocation(tool, &args).unwrap_or_else(|e| panic!("{}: {}", tool.name, e))
    }

    #[test]
    fn test_every_tool_builds_with_only_required_fields() {
        let catalog = default_catalog().unwrap();
        for tool in catalog.list() {
            let invocation = try_build(tool, required_only(tool));
            assert!(!invocation.args.is_empty(), "{} built no arguments", tool.name);
        }
    }

    #[test]
    fn test_explicit_defaults_build_same_invocation() {
        let catalog = default_catalog().unwrap();
        let mut checked = 0;
        for tool in catalog.list() {
            let implicit = try_build(tool, required_only(tool));
            for field in tool.fields.iter().filter(|f| f.default.is_some()) {
                let mut raw = required_only(tool);
                let default = field.default.as_ref().unwrap().to_json();
                raw.insert(field.name.clone(), default);

                assert_eq!(
                    try_build(tool, raw),
                    implicit,
                    "{}: passing default for '{}' changed the invocation",
                    tool.name,
                    field.name
                );
                checked += 1;
            }
        }
        assert!(checked >= 5, "only {} default-bearing fields found", checked);
    }

    #[test]
    fn test_flag_like_values_never_become_flags() {
        let catalog = default_catalog().unwrap();
        for tool in catalog.list() {
            for field in tool.required_fields().filter(|f| f.kind == FieldKind::String) {
                let mut raw = required_only(tool);
                raw.insert(field.name.clone(), json!("--all"));
                let args = DefaultToolValidator
                    .validate(tool, &Value::Object(raw))
                    .unwrap();

                let Ok(invocation) = build_invocation(tool, &args) else {
                    continue;
                };
                for (i, arg) in invocation.args.iter().enumerate() {
                    if arg == "--all" {
                        let previous = i.checked_sub(1).map(|p| invocation.args[p].as_str());
                        assert!(
                            previous.is_some_and(|p| p.starts_with('-')),
                            "{}: '{}' reached argv as a flag: {:?}",
                            tool.name,
                            field.name,
                            invocation.args
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_delete_refuses_flag_as_name() {
        let catalog = default_catalog().unwrap();
        let tool = catalog.lookup("delete").unwrap();
        let args = DefaultToolValidator
            .validate(tool, &json!({"resource": "pods", "name": "--all", "namespace": "prod"}))
            .unwrap();

        let err = build_invocation(tool, &args).unwrap_err();
        assert!(matches!(err, BuildError::FlagLikeValue { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_empty_required_name_is_missing() {
        let catalog = default_catalog().unwrap();
        let tool = catalog.lookup("describe-pod").unwrap();
        let err = DefaultToolValidator
            .validate(tool, &json!({"pod": ""}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { ref field, .. } if field == "pod"));
    }

    /// Counts calls and always succeeds
    #[derive(Default)]
    struct CountingExecutor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProcessExecutorPort for CountingExecutor {
        async fn execute(
            &self,
            _invocation: &BuiltInvocation,
            _timeout: Duration,
        ) -> Result<ExecutionOutcome, ExecutorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExecutionOutcome::success("ok"))
        }
    }

    #[tokio::test]
    async fn test_every_missing_required_field_spawns_nothing() {
        let catalog = Arc::new(default_catalog().unwrap());
        let executor = Arc::new(CountingExecutor::default());
        let dispatcher = DispatchToolUseCase::new(Arc::clone(&catalog), executor.clone());

        let mut checked = 0;
        for tool in catalog.list() {
            for field in tool.required_fields() {
                let mut raw = required_only(tool);
                raw.remove(&field.name);

                let result = dispatcher.dispatch(&tool.name, &Value::Object(raw)).await;
                assert!(result.is_error, "{} without '{}'", tool.name, field.name);
                assert_eq!(result.error_kind, Some(ErrorKind::Validation), "{}", tool.name);
                assert!(result.content.contains(&field.name), "{}: {}", tool.name, result.content);
                checked += 1;
            }
        }

        assert!(checked > 40, "only {} required fields found", checked);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_every_tool_has_description_and_fallback() {
        let catalog = default_catalog().unwrap();
        for tool in catalog.list() {
            assert!(!tool.description.is_empty(), "{}", tool.name);
            assert!(!tool.empty_output.is_empty(), "{}", tool.name);
            for field in &tool.fields {
                assert!(!field.description.is_empty(), "{}.{}", tool.name, field.name);
            }
        }
    }

    #[test]
    fn test_helm_tools_use_helm() {
        let catalog = default_catalog().unwrap();
        let helm: Vec<_> = catalog
            .list()
            .iter()
            .filter(|t| t.program() == Program::Helm)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            helm,
            vec!["helm-list", "helm-status", "helm-install", "helm-upgrade", "helm-uninstall"]
        );
    }

    #[test]
    fn test_list_pods() {
        assert_eq!(argv("list-pods", json!({})), vec!["get", "pods", "-o", "wide"]);
        assert_eq!(
            argv("list-pods", json!({"namespace": "kube-system"})),
            vec!["get", "pods", "-n", "kube-system", "-o", "wide"]
        );
    }

    #[test]
    fn test_get_logs() {
        assert_eq!(
            argv(
                "get-logs",
                json!({"pod": "web-1", "namespace": "prod", "lines": 50, "container": "app"}),
            ),
            vec!["logs", "web-1", "-n", "prod", "--tail=50", "-c", "app"]
        );
        assert_eq!(
            argv("get-logs", json!({"pod": "web-1", "follow": true})),
            vec!["logs", "web-1", "--tail=100", "-f"]
        );
    }

    #[test]
    fn test_get_logs_streams_only_when_following() {
        let catalog = default_catalog().unwrap();
        let tool = catalog.lookup("get-logs").unwrap();

        let args = DefaultToolValidator.validate(tool, &json!({"pod": "p"})).unwrap();
        assert!(!tool.is_long_running(&args));

        let args = DefaultToolValidator
            .validate(tool, &json!({"pod": "p", "follow": true}))
            .unwrap();
        assert!(tool.is_long_running(&args));
    }

    #[test]
    fn test_long_running_tools() {
        let catalog = default_catalog().unwrap();
        let always: Vec<_> = catalog
            .list()
            .iter()
            .filter(|t| t.long_running)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(always, vec!["port-forward", "port-forward-pod", "wait"]);
    }

    #[test]
    fn test_port_forward() {
        assert_eq!(
            argv("port-forward", json!({"service": "api", "localPort": 8080, "targetPort": "80"})),
            vec!["port-forward", "svc/api", "8080:80"]
        );
        assert_eq!(
            argv(
                "port-forward-pod",
                json!({"pod": "db-0", "localPort": 5432, "targetPort": 5432, "namespace": "data"}),
            ),
            vec!["port-forward", "pod/db-0", "5432:5432", "-n", "data"]
        );
    }

    #[test]
    fn test_exec_splits_command_after_separator() {
        assert_eq!(
            argv("exec", json!({"pod": "web-1", "command": "ls -la /tmp", "container": "app"})),
            vec!["exec", "web-1", "-c", "app", "--", "ls", "-la", "/tmp"]
        );
    }

    #[test]
    fn test_run_without_command() {
        assert_eq!(
            argv("run", json!({"name": "tmp", "image": "alpine"})),
            vec!["run", "tmp", "--image=alpine"]
        );
    }

    #[test]
    fn test_set_image() {
        assert_eq!(
            argv(
                "set-image",
                json!({"deployment": "web", "container": "app", "image": "nginx:1.27"}),
            ),
            vec!["set", "image", "deployment/web", "app=nginx:1.27"]
        );
    }

    #[test]
    fn test_drain_node_defaults() {
        assert_eq!(
            argv("drain-node", json!({"node": "n1"})),
            vec!["drain", "n1", "--ignore-daemonsets", "--delete-emptydir-data"]
        );
        assert_eq!(
            argv("drain-node", json!({"node": "n1", "force": true, "ignore_daemonsets": false})),
            vec!["drain", "n1", "--force", "--delete-emptydir-data"]
        );
    }

    #[test]
    fn test_patch_keeps_payload_in_one_argument() {
        let patch = r#"{"spec": {"replicas": 3}}"#;
        assert_eq!(
            argv("patch", json!({"resource": "deployment", "name": "web", "patch": patch})),
            vec!["patch", "deployment", "web", "--type=strategic", "-p", patch]
        );
    }

    #[test]
    fn test_auth_can_i_namespace_flag() {
        assert_eq!(
            argv("auth-can-i", json!({"verb": "get", "resource": "pods", "namespace": "dev"})),
            vec!["auth", "can-i", "get", "pods", "--namespace=dev"]
        );
    }

    #[test]
    fn test_pod_metrics_jsonpath_is_literal() {
        assert_eq!(
            argv("get-pod-metrics", json!({"pod": "p"})),
            vec!["get", "pod", "p", "-o", "jsonpath={.spec.containers[*].resources}"]
        );
    }

    #[test]
    fn test_argocd_namespace_default() {
        assert_eq!(
            argv("argocd-list-apps", json!({})),
            vec!["get", "applications", "-n", "argocd", "-o", "wide"]
        );
        assert_eq!(
            argv("argocd-app-status", json!({"app": "guestbook", "namespace": "cd"})),
            vec!["get", "application", "guestbook", "-n", "cd", "-o", "yaml"]
        );
    }

    #[test]
    fn test_helm_install_values_on_stdin() {
        let invocation = build(
            "helm-install",
            json!({"name": "web", "chart": "bitnami/nginx", "version": "15.0.0", "values": "replicaCount: 2\n"}),
        );
        assert_eq!(invocation.program, Program::Helm);
        assert_eq!(
            invocation.args,
            vec!["install", "web", "bitnami/nginx", "--version", "15.0.0", "-f", "-"]
        );
        assert_eq!(invocation.stdin.as_deref(), Some("replicaCount: 2\n"));
    }

    #[test]
    fn test_helm_upgrade_without_values() {
        let invocation = build("helm-upgrade", json!({"name": "web", "chart": "./chart"}));
        assert_eq!(invocation.args, vec!["upgrade", "web", "./chart"]);
        assert!(invocation.stdin.is_none());
    }

    #[test]
    fn test_create_backup() {
        let invocation = build("create-backup", json!({}));
        assert_eq!(invocation.args, vec!["get", "all", "--all-namespaces", "-o", "yaml"]);
        assert_eq!(invocation.stdout_file, Some(PathBuf::from("backup.yaml")));

        let invocation = build(
            "create-backup",
            json!({"namespace": "prod", "output": "/tmp/prod.yaml"}),
        );
        assert_eq!(invocation.args, vec!["get", "all", "-n", "prod", "-o", "yaml"]);
        assert_eq!(invocation.stdout_file, Some(PathBuf::from("/tmp/prod.yaml")));
    }

    #[test]
    fn test_current_context_is_trimmed() {
        let catalog = default_catalog().unwrap();
        assert!(catalog.lookup("current-context").unwrap().trim_output);
        assert!(!catalog.lookup("get-contexts").unwrap().trim_output);
    }
}
