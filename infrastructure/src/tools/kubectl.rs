//! kubectl tool table
//!
//! One [`ToolDescriptor`] per tool, grouped the way operators think about
//! them. Groups are concatenated by [`builtin_tools`](super::catalog::builtin_tools)
//! in published order.

use kubegate_domain::tool::command::{Token, arg, argv, lit, opt, opt_or, stdout_file, switch};
use kubegate_domain::tool::entities::{FieldKind, FieldSpec, Program, ToolDescriptor};

const CURRENT_NS: &str = "(optional, defaults to current context namespace)";

pub(super) fn namespace(description: impl Into<String>) -> FieldSpec {
    FieldSpec::optional("namespace", FieldKind::String, description)
}

fn required(name: &str, description: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::String, description)
}

fn optional(name: &str, description: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldKind::String, description)
}

/// `-n <namespace>` when a namespace was given.
pub(super) fn ns() -> Token {
    opt("-n", "{namespace}")
}

fn kubectl(name: &str, description: &str) -> ToolDescriptor {
    ToolDescriptor::new(name, description, Program::Kubectl)
}

/// `get <resource> [-n ns] -o wide`
fn listing(
    name: &str,
    description: &str,
    resource: &str,
    noun: &str,
    fallback: &str,
) -> ToolDescriptor {
    kubectl(name, description)
        .with_field(namespace(format!("The namespace to list {} from {}", noun, CURRENT_NS)))
        .with_tokens([lit("get"), lit(resource), ns(), lit("-o"), lit("wide")])
        .with_fallback(fallback)
}

/// `get <resource> -o wide`, cluster-scoped
fn cluster_listing(
    name: &str,
    description: &str,
    resource: &str,
    fallback: &str,
) -> ToolDescriptor {
    kubectl(name, description)
        .with_tokens([lit("get"), lit(resource), lit("-o"), lit("wide")])
        .with_fallback(fallback)
}

/// `describe <kind> <name> [-n ns]`
fn describe(name: &str, description: &str, kind: &str, fallback: &str) -> ToolDescriptor {
    kubectl(name, description)
        .with_field(required(kind, &format!("The name of the {} to describe", kind)))
        .with_field(namespace(format!("The namespace of the {} {}", kind, CURRENT_NS)))
        .with_tokens([lit("describe"), lit(kind), arg(format!("{{{}}}", kind)), ns()])
        .with_fallback(fallback)
}

/// Fixed command, no arguments.
fn fixed(name: &str, description: &str, args: &[&str], fallback: &str) -> ToolDescriptor {
    kubectl(name, description)
        .with_tokens(args.iter().map(|a| lit(*a)))
        .with_fallback(fallback)
}

pub(super) fn resource_listing() -> Vec<ToolDescriptor> {
    vec![
        listing(
            "list-pods",
            "List Kubernetes pods in a namespace",
            "pods",
            "pods",
            "No pods found",
        ),
        listing(
            "list-services",
            "List Kubernetes services in a namespace",
            "svc",
            "services",
            "No services found",
        ),
        listing(
            "list-deployments",
            "List Kubernetes deployments in a namespace",
            "deployments",
            "deployments",
            "No deployments found",
        ),
        cluster_listing(
            "list-namespaces",
            "List all Kubernetes namespaces",
            "namespaces",
            "No namespaces found",
        ),
        cluster_listing("list-nodes", "List all Kubernetes nodes", "nodes", "No nodes found"),
        listing(
            "list-configmaps",
            "List Kubernetes configmaps in a namespace",
            "configmaps",
            "configmaps",
            "No configmaps found",
        ),
        listing(
            "list-secrets",
            "List Kubernetes secrets in a namespace",
            "secrets",
            "secrets",
            "No secrets found",
        ),
        listing(
            "list-jobs",
            "List Kubernetes jobs in a namespace",
            "jobs",
            "jobs",
            "No jobs found",
        ),
        listing(
            "list-cronjobs",
            "List Kubernetes cronjobs in a namespace",
            "cronjobs",
            "cronjobs",
            "No cronjobs found",
        ),
        listing(
            "list-ingresses",
            "List Kubernetes ingresses in a namespace",
            "ingresses",
            "ingresses",
            "No ingresses found",
        ),
        cluster_listing(
            "list-pv",
            "List Kubernetes persistent volumes",
            "pv",
            "No persistent volumes found",
        ),
        listing(
            "list-pvc",
            "List Kubernetes persistent volume claims in a namespace",
            "pvc",
            "PVCs",
            "No persistent volume claims found",
        ),
        listing(
            "list-all",
            "List all Kubernetes resources in a namespace",
            "all",
            "all resources",
            "No resources found",
        ),
    ]
}

pub(super) fn describe_resources() -> Vec<ToolDescriptor> {
    vec![
        describe(
            "describe-pod",
            "Describe details of a Kubernetes pod",
            "pod",
            "No pod details found",
        ),
        describe(
            "describe-deployment",
            "Describe details of a Kubernetes deployment",
            "deployment",
            "No deployment details found",
        ),
        describe(
            "describe-service",
            "Describe details of a Kubernetes service",
            "service",
            "No service details found",
        ),
        kubectl("describe-node", "Describe details of a Kubernetes node")
            .with_field(required("node", "The name of the node to describe"))
            .with_tokens([lit("describe"), lit("node"), arg("{node}")])
            .with_fallback("No node details found"),
        describe(
            "describe-configmap",
            "Describe details of a Kubernetes configmap",
            "configmap",
            "No configmap details found",
        ),
        describe(
            "describe-secret",
            "Describe details of a Kubernetes secret",
            "secret",
            "No secret details found",
        ),
    ]
}

pub(super) fn logs_and_debugging() -> Vec<ToolDescriptor> {
    vec![
        kubectl("get-logs", "Get logs from a Kubernetes pod")
            .with_field(required("pod", "The name of the pod to get logs from"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_field(
                FieldSpec::optional(
                    "lines",
                    FieldKind::Number,
                    "Number of lines to retrieve from the end of the logs (default: 100)",
                )
                .with_default(100),
            )
            .with_field(
                FieldSpec::optional(
                    "follow",
                    FieldKind::Boolean,
                    "Follow the logs (stream new logs as they come in)",
                )
                .with_default(false),
            )
            .with_field(optional(
                "container",
                "The container name to get logs from (if pod has multiple containers)",
            ))
            .with_tokens([
                lit("logs"),
                arg("{pod}"),
                ns(),
                arg("--tail={lines}"),
                switch("-f", "follow"),
                opt("-c", "{container}"),
            ])
            .with_fallback("No logs found")
            .long_running_when("follow"),
        kubectl("get-events", "Get Kubernetes events for troubleshooting")
            .with_field(namespace(format!("The namespace to get events from {}", CURRENT_NS)))
            .with_tokens([lit("get"), lit("events"), ns(), lit("--sort-by=.lastTimestamp")])
            .with_fallback("No events found"),
        kubectl("top-pods", "Show resource usage for pods")
            .with_field(namespace(format!("The namespace to get pod metrics from {}", CURRENT_NS)))
            .with_tokens([lit("top"), lit("pods"), ns()])
            .with_fallback("No pod metrics found"),
        fixed(
            "top-nodes",
            "Show resource usage for nodes",
            &["top", "nodes"],
            "No node metrics found",
        ),
    ]
}

fn port_forward(name: &str, description: &str, kind: &str, prefix: &str) -> ToolDescriptor {
    kubectl(name, description)
        .with_field(required(
            kind,
            &format!("The name of the Kubernetes {} to port-forward", kind),
        ))
        .with_field(namespace(format!("The namespace of the {} {}", kind, CURRENT_NS)))
        .with_field(FieldSpec::required(
            "localPort",
            FieldKind::Number,
            "The local port to forward to",
        ))
        .with_field(FieldSpec::required(
            "targetPort",
            FieldKind::Number,
            format!("The target port on the {}", kind),
        ))
        .with_tokens([
            lit("port-forward"),
            arg(format!("{}/{{{}}}", prefix, kind)),
            arg("{localPort}:{targetPort}"),
            ns(),
        ])
        .with_fallback(format!(
            "Port-forwarding started for {{{}}}:{{targetPort}} -> localhost:{{localPort}}",
            kind
        ))
        .long_running()
}

pub(super) fn networking() -> Vec<ToolDescriptor> {
    vec![
        port_forward(
            "port-forward",
            "Port forward a Kubernetes service to a local port",
            "service",
            "svc",
        ),
        port_forward(
            "port-forward-pod",
            "Port forward a Kubernetes pod to a local port",
            "pod",
            "pod",
        ),
    ]
}

fn rollout(
    name: &str,
    description: &str,
    verb: &str,
    purpose: &str,
    fallback: &str,
) -> ToolDescriptor {
    kubectl(name, description)
        .with_field(required("deployment", &format!("The name of the deployment to {}", purpose)))
        .with_field(namespace(format!("The namespace of the deployment {}", CURRENT_NS)))
        .with_tokens([lit("rollout"), lit(verb), arg("deployment/{deployment}"), ns()])
        .with_fallback(fallback)
}

pub(super) fn workloads() -> Vec<ToolDescriptor> {
    vec![
        kubectl(
            "scale-deployment",
            "Scale a Kubernetes deployment to a specified number of replicas",
        )
        .with_field(required("deployment", "The name of the deployment to scale"))
        .with_field(namespace(format!("The namespace of the deployment {}", CURRENT_NS)))
        .with_field(FieldSpec::required(
            "replicas",
            FieldKind::Number,
            "The number of replicas to scale to",
        ))
        .with_tokens([
            lit("scale"),
            lit("deployment"),
            arg("{deployment}"),
            arg("--replicas={replicas}"),
            ns(),
        ])
        .with_fallback("Deployment {deployment} scaled to {replicas} replicas"),
        rollout(
            "rollout-status",
            "Check the rollout status of a deployment",
            "status",
            "check",
            "Unable to get rollout status",
        ),
        rollout(
            "rollout-restart",
            "Restart a deployment by triggering a rollout",
            "restart",
            "restart",
            "Deployment {deployment} rollout restarted",
        ),
        rollout(
            "rollout-history",
            "Show the rollout history of a deployment",
            "history",
            "check history for",
            "No rollout history found",
        ),
        kubectl("set-image", "Update the image of a deployment")
            .with_field(required("deployment", "The name of the deployment to update"))
            .with_field(required("container", "The name of the container to update"))
            .with_field(required("image", "The new image to use"))
            .with_field(namespace(format!("The namespace of the deployment {}", CURRENT_NS)))
            .with_tokens([
                lit("set"),
                lit("image"),
                arg("deployment/{deployment}"),
                arg("{container}={image}"),
                ns(),
            ])
            .with_fallback("Image updated for deployment {deployment}"),
    ]
}

pub(super) fn exec_and_files() -> Vec<ToolDescriptor> {
    vec![
        kubectl("exec", "Execute a command in a pod container")
            .with_field(required("pod", "The name of the pod to execute in"))
            .with_field(required("command", "The command to execute"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_field(optional(
                "container",
                "The container name to execute in (if pod has multiple containers)",
            ))
            .with_tokens([
                lit("exec"),
                arg("{pod}"),
                ns(),
                opt("-c", "{container}"),
                argv("command"),
            ])
            .with_fallback("Command executed"),
        kubectl("cp", "Copy files to/from a pod")
            .with_field(required("pod", "The name of the pod"))
            .with_field(required("source", "Source path (local:path or pod:path)"))
            .with_field(required("destination", "Destination path (local:path or pod:path)"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_field(optional(
                "container",
                "The container name (if pod has multiple containers)",
            ))
            .with_tokens([
                lit("cp"),
                arg("{source}"),
                arg("{pod}:{destination}"),
                ns(),
                opt("-c", "{container}"),
            ])
            .with_fallback("File copied from {source} to {pod}:{destination}"),
    ]
}

pub(super) fn config_and_secrets() -> Vec<ToolDescriptor> {
    vec![
        kubectl("get-configmap", "Get the data from a configmap")
            .with_field(required("configmap", "The name of the configmap"))
            .with_field(namespace(format!("The namespace of the configmap {}", CURRENT_NS)))
            .with_tokens([
                lit("get"),
                lit("configmap"),
                arg("{configmap}"),
                ns(),
                lit("-o"),
                lit("yaml"),
            ])
            .with_fallback("No configmap data found"),
        kubectl("get-secret", "Get the data from a secret")
            .with_field(required("secret", "The name of the secret"))
            .with_field(namespace(format!("The namespace of the secret {}", CURRENT_NS)))
            .with_tokens([lit("get"), lit("secret"), arg("{secret}"), ns(), lit("-o"), lit("yaml")])
            .with_fallback("No secret data found"),
    ]
}

pub(super) fn cluster_information() -> Vec<ToolDescriptor> {
    vec![
        fixed(
            "cluster-info",
            "Get cluster information",
            &["cluster-info"],
            "Unable to get cluster info",
        ),
        fixed(
            "version",
            "Get Kubernetes version information",
            &["version", "--short"],
            "Unable to get version info",
        ),
        fixed(
            "api-resources",
            "Get available API resources",
            &["api-resources"],
            "No API resources found",
        ),
        fixed(
            "api-versions",
            "Get available API versions",
            &["api-versions"],
            "No API versions found",
        ),
    ]
}

pub(super) fn contexts() -> Vec<ToolDescriptor> {
    vec![
        fixed(
            "current-context",
            "Get the current kubectl context",
            &["config", "current-context"],
            "No current context",
        )
        .trimmed(),
        fixed(
            "get-contexts",
            "List all kubectl contexts",
            &["config", "get-contexts"],
            "No contexts found",
        ),
        kubectl("use-context", "Switch to a different kubectl context")
            .with_field(required("context", "The context name to switch to"))
            .with_tokens([lit("config"), lit("use-context"), arg("{context}")])
            .with_fallback("Switched to context {context}"),
    ]
}

pub(super) fn create_and_delete() -> Vec<ToolDescriptor> {
    vec![
        kubectl("apply", "Apply a Kubernetes manifest from a file or URL")
            .with_field(required("file", "Path to the manifest file or URL"))
            .with_field(namespace(format!("The namespace to apply to {}", CURRENT_NS)))
            .with_tokens([lit("apply"), opt("-f", "{file}"), ns()])
            .with_fallback("Applied manifest from {file}"),
        kubectl("delete", "Delete a Kubernetes resource")
            .with_field(required("resource", "The resource type (pod, deployment, service, etc.)"))
            .with_field(required("name", "The name of the resource"))
            .with_field(namespace(format!("The namespace of the resource {}", CURRENT_NS)))
            .with_tokens([lit("delete"), arg("{resource}"), arg("{name}"), ns()])
            .with_fallback("Deleted {resource} {name}"),
        kubectl("create-namespace", "Create a new namespace")
            .with_field(required("name", "The name of the namespace to create"))
            .with_tokens([lit("create"), lit("namespace"), arg("{name}")])
            .with_fallback("Created namespace {name}"),
    ]
}

pub(super) fn debugging() -> Vec<ToolDescriptor> {
    vec![
        kubectl("debug-pod", "Create a debug container in a pod")
            .with_field(required("pod", "The name of the pod to debug"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_field(
                optional(
                    "image",
                    "The debug container image to use (optional, defaults to busybox)",
                )
                .with_default("busybox"),
            )
            .with_tokens([
                lit("debug"),
                arg("{pod}"),
                ns(),
                arg("--image={image}"),
                lit("--share-processes"),
                arg("--copy-to={pod}-debug"),
            ])
            .with_fallback("Debug pod created for {pod}"),
        kubectl("run", "Run a pod with a specific image")
            .with_field(required("name", "The name of the pod to run"))
            .with_field(required("image", "The container image to use"))
            .with_field(namespace(format!("The namespace to run in {}", CURRENT_NS)))
            .with_field(optional("command", "The command to run (optional)"))
            .with_tokens([lit("run"), arg("{name}"), arg("--image={image}"), ns(), argv("command")])
            .with_fallback("Pod {name} created with image {image}"),
    ]
}

pub(super) fn rbac() -> Vec<ToolDescriptor> {
    vec![
        listing(
            "list-serviceaccounts",
            "List Kubernetes service accounts in a namespace",
            "serviceaccounts",
            "service accounts",
            "No service accounts found",
        ),
        listing(
            "list-roles",
            "List Kubernetes roles in a namespace",
            "roles",
            "roles",
            "No roles found",
        ),
        listing(
            "list-rolebindings",
            "List Kubernetes role bindings in a namespace",
            "rolebindings",
            "role bindings",
            "No role bindings found",
        ),
        cluster_listing(
            "list-clusterroles",
            "List Kubernetes cluster roles",
            "clusterroles",
            "No cluster roles found",
        ),
        cluster_listing(
            "list-clusterrolebindings",
            "List Kubernetes cluster role bindings",
            "clusterrolebindings",
            "No cluster role bindings found",
        ),
        kubectl("auth-can-i", "Check if the current user can perform an action")
            .with_field(required(
                "verb",
                "The verb to check (get, list, create, update, delete, etc.)",
            ))
            .with_field(required("resource", "The resource type to check"))
            .with_field(namespace("The namespace to check (optional)"))
            .with_tokens([
                lit("auth"),
                lit("can-i"),
                arg("{verb}"),
                arg("{resource}"),
                arg("--namespace={namespace}"),
            ])
            .with_fallback("Authorization check result"),
    ]
}

pub(super) fn network_policies() -> Vec<ToolDescriptor> {
    vec![
        listing(
            "list-networkpolicies",
            "List Kubernetes network policies in a namespace",
            "networkpolicies",
            "network policies",
            "No network policies found",
        ),
        listing(
            "list-endpoints",
            "List Kubernetes endpoints in a namespace",
            "endpoints",
            "endpoints",
            "No endpoints found",
        ),
    ]
}

pub(super) fn quotas_and_scaling() -> Vec<ToolDescriptor> {
    vec![
        listing(
            "list-resourcequotas",
            "List Kubernetes resource quotas in a namespace",
            "resourcequotas",
            "resource quotas",
            "No resource quotas found",
        ),
        listing(
            "list-limitranges",
            "List Kubernetes limit ranges in a namespace",
            "limitranges",
            "limit ranges",
            "No limit ranges found",
        ),
        listing(
            "list-hpa",
            "List Kubernetes horizontal pod autoscalers in a namespace",
            "hpa",
            "HPAs",
            "No horizontal pod autoscalers found",
        ),
    ]
}

pub(super) fn custom_resources() -> Vec<ToolDescriptor> {
    vec![
        cluster_listing(
            "list-crds",
            "List Kubernetes custom resource definitions",
            "crds",
            "No custom resource definitions found",
        ),
        kubectl("get-crd", "Get a custom resource definition")
            .with_field(required("name", "The name of the CRD"))
            .with_tokens([lit("get"), lit("crd"), arg("{name}"), lit("-o"), lit("yaml")])
            .with_fallback("CRD not found"),
    ]
}

/// Fields shared by tools addressing `<resource> <name>`.
fn resource_and_name(tool: ToolDescriptor, resource_description: &str) -> ToolDescriptor {
    tool.with_field(required("resource", resource_description))
        .with_field(required("name", "The name of the resource"))
}

pub(super) fn advanced_operations() -> Vec<ToolDescriptor> {
    vec![
        resource_and_name(
            kubectl("wait", "Wait for a condition on a resource"),
            "The resource type (pod, deployment, etc.)",
        )
        .with_field(required("condition", "The condition to wait for (ready, available, etc.)"))
        .with_field(namespace(format!("The namespace of the resource {}", CURRENT_NS)))
        .with_field(optional("timeout", "Timeout duration (default: 300s)").with_default("300s"))
        .with_tokens([
            lit("wait"),
            arg("{resource}/{name}"),
            arg("--for=condition={condition}"),
            arg("--timeout={timeout}"),
            ns(),
        ])
        .with_fallback("Wait condition met for {resource}/{name}")
        .long_running(),
        resource_and_name(kubectl("patch", "Patch a Kubernetes resource"), "The resource type")
            .with_field(required("patch", "The patch to apply (JSON or YAML)"))
            .with_field(
                optional("type", "The patch type (strategic, merge, json)")
                    .with_default("strategic"),
            )
            .with_field(namespace(format!("The namespace of the resource {}", CURRENT_NS)))
            .with_tokens([
                lit("patch"),
                arg("{resource}"),
                arg("{name}"),
                arg("--type={type}"),
                lit("-p"),
                arg("{patch}"),
                ns(),
            ])
            .with_fallback("{resource} {name} patched successfully"),
        resource_and_name(
            kubectl("label", "Add or update labels on a resource"),
            "The resource type",
        )
        .with_field(required("labels", "Labels to add/update (key=value,key2=value2)"))
        .with_field(namespace(format!("The namespace of the resource {}", CURRENT_NS)))
        .with_tokens([lit("label"), arg("{resource}"), arg("{name}"), arg("{labels}"), ns()])
        .with_fallback("Labels updated on {resource} {name}"),
        resource_and_name(
            kubectl("annotate", "Add or update annotations on a resource"),
            "The resource type",
        )
        .with_field(required("annotations", "Annotations to add/update (key=value,key2=value2)"))
        .with_field(namespace(format!("The namespace of the resource {}", CURRENT_NS)))
        .with_tokens([
            lit("annotate"),
            arg("{resource}"),
            arg("{name}"),
            arg("{annotations}"),
            ns(),
        ])
        .with_fallback("Annotations updated on {resource} {name}"),
    ]
}

pub(super) fn diagnostics() -> Vec<ToolDescriptor> {
    vec![
        kubectl("get-pod-metrics", "Get detailed metrics for a pod")
            .with_field(required("pod", "The name of the pod"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_tokens([
                lit("get"),
                lit("pod"),
                arg("{pod}"),
                ns(),
                lit("-o"),
                lit("jsonpath={.spec.containers[*].resources}"),
            ])
            .with_fallback("Unable to get pod metrics"),
        kubectl("get-node-metrics", "Get detailed metrics for a node")
            .with_field(required("node", "The name of the node"))
            .with_tokens([lit("describe"), lit("node"), arg("{node}")])
            .with_fallback("Unable to get node metrics"),
        kubectl("cordon-node", "Mark a node as unschedulable")
            .with_field(required("node", "The name of the node to cordon"))
            .with_tokens([lit("cordon"), arg("{node}")])
            .with_fallback("Node {node} cordoned"),
        kubectl("uncordon-node", "Mark a node as schedulable")
            .with_field(required("node", "The name of the node to uncordon"))
            .with_tokens([lit("uncordon"), arg("{node}")])
            .with_fallback("Node {node} uncordoned"),
        kubectl("drain-node", "Drain a node for maintenance")
            .with_field(required("node", "The name of the node to drain"))
            .with_field(
                FieldSpec::optional(
                    "force",
                    FieldKind::Boolean,
                    "Force drain even if there are unmanaged pods",
                )
                .with_default(false),
            )
            .with_field(
                FieldSpec::optional(
                    "ignore_daemonsets",
                    FieldKind::Boolean,
                    "Ignore DaemonSet pods during drain",
                )
                .with_default(true),
            )
            .with_tokens([
                lit("drain"),
                arg("{node}"),
                switch("--force", "force"),
                switch("--ignore-daemonsets", "ignore_daemonsets"),
                lit("--delete-emptydir-data"),
            ])
            .with_fallback("Node {node} drained successfully"),
    ]
}

fn argocd_namespace(description: &str) -> FieldSpec {
    namespace(description).with_default("argocd")
}

pub(super) fn argocd() -> Vec<ToolDescriptor> {
    vec![
        kubectl("argocd-list-apps", "List ArgoCD applications")
            .with_field(argocd_namespace(
                "The namespace to list apps from (optional, defaults to argocd namespace)",
            ))
            .with_tokens([lit("get"), lit("applications"), ns(), lit("-o"), lit("wide")])
            .with_fallback("No ArgoCD applications found"),
        kubectl("argocd-app-status", "Get the status of an ArgoCD application")
            .with_field(required("app", "The name of the ArgoCD application"))
            .with_field(argocd_namespace(
                "The namespace of the application (optional, defaults to argocd namespace)",
            ))
            .with_tokens([
                lit("get"),
                lit("application"),
                arg("{app}"),
                ns(),
                lit("-o"),
                lit("yaml"),
            ])
            .with_fallback("ArgoCD application not found"),
    ]
}

pub(super) fn istio() -> Vec<ToolDescriptor> {
    vec![
        listing(
            "istio-list-virtualservices",
            "List Istio virtual services",
            "virtualservices",
            "virtual services",
            "No Istio virtual services found",
        ),
        listing(
            "istio-list-gateways",
            "List Istio gateways",
            "gateways",
            "gateways",
            "No Istio gateways found",
        ),
    ]
}

pub(super) fn cluster_metrics() -> Vec<ToolDescriptor> {
    vec![fixed(
        "get-cluster-metrics",
        "Get cluster-wide metrics",
        &["get", "--raw", "/apis/metrics.k8s.io/v1beta1/nodes"],
        "Unable to get cluster metrics",
    )]
}

pub(super) fn ephemeral_debugging() -> Vec<ToolDescriptor> {
    vec![
        kubectl("create-ephemeral-container", "Create an ephemeral debug container in a pod")
            .with_field(required("pod", "The name of the pod"))
            .with_field(required("image", "The container image to use for debugging"))
            .with_field(required("name", "The name of the ephemeral container"))
            .with_field(namespace(format!("The namespace of the pod {}", CURRENT_NS)))
            .with_field(optional("command", "The command to run in the container"))
            .with_tokens([
                lit("debug"),
                arg("{pod}"),
                ns(),
                arg("--image={image}"),
                arg("--container={name}"),
                lit("--ephemeral-containers"),
                argv("command"),
            ])
            .with_fallback("Ephemeral container {name} created in pod {pod}"),
    ]
}

pub(super) fn resource_analysis() -> Vec<ToolDescriptor> {
    vec![
        kubectl("analyze-resource-usage", "Analyze resource usage across the cluster")
            .with_field(namespace(
                "The namespace to analyze (optional, analyzes all namespaces if not specified)",
            ))
            .with_tokens([lit("top"), lit("pods"), ns(), lit("--containers")])
            .with_fallback("Unable to analyze resource usage"),
    ]
}

pub(super) fn backup() -> Vec<ToolDescriptor> {
    vec![
        kubectl("create-backup", "Create a backup of cluster resources")
            .with_field(namespace(
                "The namespace to backup (optional, backs up all namespaces if not specified)",
            ))
            .with_field(
                optional("output", "Output file path for the backup")
                    .with_default("backup.yaml"),
            )
            .with_tokens([
                lit("get"),
                lit("all"),
                opt_or("-n", "{namespace}", "--all-namespaces"),
                lit("-o"),
                lit("yaml"),
                stdout_file("output"),
            ])
            .with_fallback("Backup created in {output}"),
    ]
}
