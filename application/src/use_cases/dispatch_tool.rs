//! Dispatch tool use case
//!
//! Runs one tool call through the pipeline:
//!
//! ```text
//! Lookup ──▶ Validate ──▶ Build ──▶ Execute ──▶ Shape
//!    │           │           │          │          ▲
//!    └───────────┴───────────┴──────────┴──────────┘
//!                  first failure short-circuits
//! ```
//!
//! The dispatcher never fails outward: every call produces a [`ToolResult`],
//! with failures rendered as `"Error: ..."` text and `is_error` set.

use crate::config::ExecutionPolicy;
use crate::ports::process_executor::{ExecutorError, ProcessExecutorPort};
use kubegate_domain::tool::{
    catalog::ToolCatalog,
    command::{BuildError, BuiltInvocation, build_invocation},
    entities::ToolDescriptor,
    template::render_lenient,
    validation::{DefaultToolValidator, ToolValidator, ValidatedArguments, ValidationError},
    value_objects::{ErrorKind, ExecutionOutcome, ExecutionStatus, ToolResult},
};
use kubegate_domain::util::clip;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Bytes of stderr kept in a log line.
const LOG_PREVIEW_BYTES: usize = 512;

/// Why a call failed. Rendered into the result text, never returned.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Command failed: {command}\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Command timed out after {}s: {command}{}", .timeout.as_secs(), partial_suffix(.partial))]
    TimedOut {
        command: String,
        timeout: Duration,
        partial: String,
    },

    #[error("Dispatcher is shutting down")]
    ShuttingDown,
}

fn partial_suffix(partial: &str) -> String {
    if partial.is_empty() {
        String::new()
    } else {
        format!("\n{}", partial)
    }
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownTool(_) => ErrorKind::Lookup,
            DispatchError::Validation(_) | DispatchError::Build(_) => ErrorKind::Validation,
            DispatchError::Executor(_)
            | DispatchError::CommandFailed { .. }
            | DispatchError::ShuttingDown => ErrorKind::Execution,
            DispatchError::TimedOut { .. } => ErrorKind::Timeout,
        }
    }
}

/// One inbound call: a tool name plus its raw JSON arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub tool_name: String,
    pub arguments: Value,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Use case for executing a single tool call.
///
/// Cheap to share: wrap it in an `Arc` and call it from as many tasks as
/// needed. Concurrent process count is bounded by
/// [`ExecutionPolicy::max_concurrent`].
pub struct DispatchToolUseCase {
    catalog: Arc<ToolCatalog>,
    executor: Arc<dyn ProcessExecutorPort>,
    validator: DefaultToolValidator,
    policy: ExecutionPolicy,
    permits: Semaphore,
}

impl DispatchToolUseCase {
    pub fn new(catalog: Arc<ToolCatalog>, executor: Arc<dyn ProcessExecutorPort>) -> Self {
        Self::with_policy(catalog, executor, ExecutionPolicy::default())
    }

    pub fn with_policy(
        catalog: Arc<ToolCatalog>,
        executor: Arc<dyn ProcessExecutorPort>,
        policy: ExecutionPolicy,
    ) -> Self {
        let permits = Semaphore::new(policy.max_concurrent.max(1));
        Self {
            catalog,
            executor,
            validator: DefaultToolValidator,
            policy,
            permits,
        }
    }

    /// Refuse further executions. Calls already holding a permit finish.
    pub fn shutdown(&self) {
        self.permits.close();
    }

    /// Convenience wrapper around [`execute`](Self::execute).
    pub async fn dispatch(&self, tool_name: &str, arguments: &Value) -> ToolResult {
        self.run(tool_name, arguments).await
    }

    pub async fn execute(&self, request: &InvocationRequest) -> ToolResult {
        self.run(&request.tool_name, &request.arguments).await
    }

    async fn run(&self, tool_name: &str, arguments: &Value) -> ToolResult {
        match self.try_dispatch(tool_name, arguments).await {
            Ok(content) => ToolResult::success(content),
            Err(e) => {
                let kind = e.kind();
                warn!(
                    tool = tool_name,
                    kind = %kind,
                    "Tool call failed: {}",
                    clip(&e.to_string(), LOG_PREVIEW_BYTES),
                );
                ToolResult::error(kind, e)
            }
        }
    }

    async fn try_dispatch(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> Result<String, DispatchError> {
        let tool = self
            .catalog
            .lookup(tool_name)
            .ok_or_else(|| DispatchError::UnknownTool(tool_name.to_string()))?;
        debug!(tool = tool_name, "Tool found");

        let args = self.validator.validate(tool, arguments)?;
        debug!(tool = tool_name, fields = args.len(), "Arguments validated");

        let invocation = build_invocation(tool, &args)?;
        debug!(tool = tool_name, command = %invocation, "Invocation built");

        let timeout = self.policy.timeout_for(tool, &args);
        let outcome = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| DispatchError::ShuttingDown)?;
            self.executor.execute(&invocation, timeout).await?
        };

        shape(tool, &args, &invocation, timeout, outcome)
    }
}

/// Turn an execution outcome into the response text.
fn shape(
    tool: &ToolDescriptor,
    args: &ValidatedArguments,
    invocation: &BuiltInvocation,
    timeout: Duration,
    outcome: ExecutionOutcome,
) -> Result<String, DispatchError> {
    match outcome.status {
        ExecutionStatus::Success => {
            info!(
                tool = %tool.name,
                duration_ms = outcome.duration_ms,
                bytes = outcome.stdout.len(),
                truncated = outcome.truncated,
                "Tool call completed"
            );
            let text = if tool.trim_output {
                outcome.stdout.trim()
            } else {
                outcome.stdout.as_str()
            };
            if text.is_empty() {
                Ok(render_lenient(&tool.empty_output, args))
            } else {
                Ok(text.to_string())
            }
        }
        ExecutionStatus::Failure { exit_code } => Err(DispatchError::CommandFailed {
            command: invocation.to_string(),
            exit_code,
            stderr: outcome.stderr,
        }),
        ExecutionStatus::Timeout => Err(DispatchError::TimedOut {
            command: invocation.to_string(),
            timeout,
            partial: outcome.stdout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kubegate_domain::tool::command::{arg, argv, lit, opt, switch};
    use kubegate_domain::tool::entities::{FieldKind, FieldSpec, Program};
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Reply = Result<ExecutionOutcome, ExecutorError>;
    type Responder = Box<dyn Fn(&BuiltInvocation) -> Reply + Send + Sync>;

    /// Records every invocation and answers with a canned outcome
    struct RecordingExecutor {
        calls: Mutex<Vec<(BuiltInvocation, Duration)>>,
        respond: Responder,
    }

    impl RecordingExecutor {
        fn new(
            respond: impl Fn(&BuiltInvocation) -> Reply + Send + Sync + 'static,
        ) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        fn replying(stdout: &'static str) -> Self {
            Self::new(move |_| Ok(ExecutionOutcome::success(stdout)))
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_args(&self) -> Vec<String> {
            self.calls.lock().unwrap().last().unwrap().0.args.clone()
        }

        fn last_timeout(&self) -> Duration {
            self.calls.lock().unwrap().last().unwrap().1
        }
    }

    #[async_trait]
    impl ProcessExecutorPort for RecordingExecutor {
        async fn execute(
            &self,
            invocation: &BuiltInvocation,
            timeout: Duration,
        ) -> Result<ExecutionOutcome, ExecutorError> {
            self.calls.lock().unwrap().push((invocation.clone(), timeout));
            (self.respond)(invocation)
        }
    }

    fn namespace() -> FieldSpec {
        FieldSpec::optional("namespace", FieldKind::String, "Namespace")
    }

    fn test_catalog() -> Arc<ToolCatalog> {
        let tools = vec![
            ToolDescriptor::new("list-pods", "List pods", Program::Kubectl)
                .with_field(namespace())
                .with_tokens([
                    lit("get"),
                    lit("pods"),
                    opt("-n", "{namespace}"),
                    lit("-o"),
                    lit("wide"),
                ])
                .with_fallback("No pods found"),
            ToolDescriptor::new("get-logs", "Get logs", Program::Kubectl)
                .with_field(FieldSpec::required("pod", FieldKind::String, "Pod"))
                .with_field(namespace())
                .with_field(
                    FieldSpec::optional("lines", FieldKind::Number, "Lines")
                        .with_default(100),
                )
                .with_field(
                    FieldSpec::optional("follow", FieldKind::Boolean, "Follow")
                        .with_default(false),
                )
                .with_tokens([
                    lit("logs"),
                    arg("{pod}"),
                    opt("-n", "{namespace}"),
                    arg("--tail={lines}"),
                    switch("-f", "follow"),
                ])
                .with_fallback("No logs found"),
            ToolDescriptor::new("scale-deployment", "Scale", Program::Kubectl)
                .with_field(FieldSpec::required("deployment", FieldKind::String, "Deployment"))
                .with_field(namespace())
                .with_field(FieldSpec::required("replicas", FieldKind::Number, "Replicas"))
                .with_tokens([
                    lit("scale"),
                    lit("deployment"),
                    arg("{deployment}"),
                    arg("--replicas={replicas}"),
                    opt("-n", "{namespace}"),
                ])
                .with_fallback("Deployment {deployment} scaled to {replicas} replicas"),
            ToolDescriptor::new("port-forward", "Forward", Program::Kubectl)
                .with_field(FieldSpec::required("service", FieldKind::String, "Service"))
                .with_field(FieldSpec::required("localPort", FieldKind::Number, "Local"))
                .with_field(FieldSpec::required("targetPort", FieldKind::Number, "Target"))
                .with_tokens([
                    lit("port-forward"),
                    arg("svc/{service}"),
                    arg("{localPort}:{targetPort}"),
                ])
                .long_running(),
            ToolDescriptor::new("exec", "Exec", Program::Kubectl)
                .with_field(FieldSpec::required("pod", FieldKind::String, "Pod"))
                .with_field(FieldSpec::required("command", FieldKind::String, "Command"))
                .with_tokens([lit("exec"), arg("{pod}"), argv("command")])
                .with_fallback("Command executed"),
            ToolDescriptor::new("current-context", "Context", Program::Kubectl)
                .with_tokens([lit("config"), lit("current-context")])
                .with_fallback("No current context")
                .trimmed(),
        ];
        Arc::new(ToolCatalog::new(tools).unwrap())
    }

    fn use_case(executor: Arc<RecordingExecutor>) -> DispatchToolUseCase {
        DispatchToolUseCase::new(test_catalog(), executor)
    }

    #[tokio::test]
    async fn test_list_pods_in_namespace() {
        let executor = Arc::new(RecordingExecutor::replying("pod-a  Running"));
        let result = use_case(executor.clone())
            .dispatch("list-pods", &json!({"namespace": "prod"}))
            .await;

        assert_eq!(result, ToolResult::success("pod-a  Running"));
        assert_eq!(executor.last_args(), vec!["get", "pods", "-n", "prod", "-o", "wide"]);
    }

    #[tokio::test]
    async fn test_get_logs_defaults_and_fallback() {
        let executor = Arc::new(RecordingExecutor::replying(""));
        let result = use_case(executor.clone())
            .dispatch("get-logs", &json!({"pod": "web-1"}))
            .await;

        assert_eq!(result.content, "No logs found");
        assert!(!result.is_error);
        assert_eq!(executor.last_args(), vec!["logs", "web-1", "--tail=100"]);
    }

    #[tokio::test]
    async fn test_explicit_defaults_build_same_command() {
        let executor = Arc::new(RecordingExecutor::replying("line"));
        let dispatcher = use_case(executor.clone());

        dispatcher.dispatch("get-logs", &json!({"pod": "web-1"})).await;
        let implicit = executor.last_args();
        dispatcher
            .dispatch("get-logs", &json!({"pod": "web-1", "lines": 100, "follow": false}))
            .await;

        assert_eq!(executor.last_args(), implicit);
    }

    #[tokio::test]
    async fn test_scale_deployment_fallback_uses_arguments() {
        let executor = Arc::new(RecordingExecutor::replying(""));
        let result = use_case(executor.clone())
            .dispatch("scale-deployment", &json!({"deployment": "api", "replicas": 3}))
            .await;

        assert_eq!(result.content, "Deployment api scaled to 3 replicas");
        assert_eq!(executor.last_args(), vec!["scale", "deployment", "api", "--replicas=3"]);
    }

    #[tokio::test]
    async fn test_missing_required_field_spawns_nothing() {
        let executor = Arc::new(RecordingExecutor::replying("unused"));
        let result = use_case(executor.clone())
            .dispatch("scale-deployment", &json!({"deployment": "api"}))
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Error: "));
        assert!(result.content.contains("replicas"));
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_type_mismatch_spawns_nothing() {
        let executor = Arc::new(RecordingExecutor::replying("unused"));
        let result = use_case(executor.clone())
            .dispatch("get-logs", &json!({"pod": "web-1", "follow": "yes"}))
            .await;

        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_command_is_validation_error() {
        let executor = Arc::new(RecordingExecutor::replying("unused"));
        let result = use_case(executor.clone())
            .dispatch("exec", &json!({"pod": "web-1", "command": "echo 'unterminated"}))
            .await;

        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let executor = Arc::new(RecordingExecutor::replying("unused"));
        let result = use_case(executor.clone()).dispatch("bogus-tool", &json!({})).await;

        assert_eq!(result.content, "Error: Unknown tool: bogus-tool");
        assert!(result.is_error);
        assert_eq!(result.error_kind, Some(ErrorKind::Lookup));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let executor = Arc::new(RecordingExecutor::new(|_| {
            Ok(ExecutionOutcome::failure(
                Some(1),
                "Error from server (NotFound): pods \"ghost\" not found",
            ))
        }));
        let result = use_case(executor)
            .dispatch("get-logs", &json!({"pod": "ghost"}))
            .await;

        assert!(result.is_error);
        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
        assert!(result.content.starts_with("Error: Command failed: kubectl logs ghost"));
        assert!(result.content.contains("NotFound"));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let executor = Arc::new(RecordingExecutor::new(|inv| {
            Err(ExecutorError::Spawn {
                program: inv.program.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            })
        }));
        let result = use_case(executor).dispatch("list-pods", &json!({})).await;

        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
        assert!(result.content.contains("Failed to start kubectl"));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct() {
        let executor = Arc::new(RecordingExecutor::new(|_| {
            Ok(ExecutionOutcome::timeout("Forwarding from 127.0.0.1:8080 -> 80", ""))
        }));
        let policy = ExecutionPolicy::default().with_streaming_timeout(Duration::from_secs(5));
        let dispatcher = DispatchToolUseCase::with_policy(test_catalog(), executor.clone(), policy);

        let result = dispatcher
            .dispatch(
                "port-forward",
                &json!({"service": "web", "localPort": 8080, "targetPort": 80}),
            )
            .await;

        assert!(result.is_error);
        assert_eq!(result.error_kind, Some(ErrorKind::Timeout));
        let expected = "Error: Command timed out after 5s: kubectl port-forward svc/web 8080:80";
        assert!(result.content.starts_with(expected));
        assert!(result.content.ends_with("Forwarding from 127.0.0.1:8080 -> 80"));
        assert_eq!(executor.last_timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_regular_tool_gets_default_timeout() {
        let executor = Arc::new(RecordingExecutor::replying("x"));
        let policy = ExecutionPolicy::default().with_default_timeout(Duration::from_secs(42));
        let dispatcher = DispatchToolUseCase::with_policy(test_catalog(), executor.clone(), policy);

        dispatcher.dispatch("list-pods", &json!({})).await;
        assert_eq!(executor.last_timeout(), Duration::from_secs(42));
    }

    #[tokio::test]
    async fn test_injection_text_stays_one_argument() {
        let executor = Arc::new(RecordingExecutor::replying("x"));
        use_case(executor.clone())
            .dispatch("list-pods", &json!({"namespace": "prod; rm -rf /"}))
            .await;

        assert_eq!(executor.last_args(), vec!["get", "pods", "-n", "prod; rm -rf /", "-o", "wide"]);
    }

    #[tokio::test]
    async fn test_trimmed_output_and_whitespace_fallback() {
        let executor = Arc::new(RecordingExecutor::replying("minikube\n"));
        let result = use_case(executor).dispatch("current-context", &json!({})).await;
        assert_eq!(result.content, "minikube");

        let blank = Arc::new(RecordingExecutor::replying("  \n"));
        let result = use_case(blank).dispatch("current-context", &json!({})).await;
        assert_eq!(result.content, "No current context");
    }

    #[tokio::test]
    async fn test_untrimmed_output_kept_verbatim() {
        let executor = Arc::new(RecordingExecutor::replying("NAME  STATUS\n"));
        let result = use_case(executor).dispatch("list-pods", &json!({})).await;
        assert_eq!(result.content, "NAME  STATUS\n");
    }

    #[tokio::test]
    async fn test_shutdown_refuses_new_calls() {
        let executor = Arc::new(RecordingExecutor::replying("unused"));
        let dispatcher = use_case(executor.clone());
        dispatcher.shutdown();

        let result = dispatcher.dispatch("list-pods", &json!({})).await;
        assert_eq!(result.content, "Error: Dispatcher is shutting down");
        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
        assert_eq!(executor.call_count(), 0);

        // Lookup and validation still answer before the executor is reached
        let unknown = dispatcher.dispatch("bogus-tool", &json!({})).await;
        assert_eq!(unknown.error_kind, Some(ErrorKind::Lookup));
    }

    #[tokio::test]
    async fn test_execute_with_request() {
        let executor = Arc::new(RecordingExecutor::replying("ok"));
        let request = InvocationRequest::new("list-pods", Value::Null);
        let result = use_case(executor).execute(&request).await;
        assert_eq!(result.content, "ok");
    }

    /// Tracks how many executions overlap
    struct SlowExecutor {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ProcessExecutorPort for SlowExecutor {
        async fn execute(
            &self,
            _invocation: &BuiltInvocation,
            _timeout: Duration,
        ) -> Result<ExecutionOutcome, ExecutorError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ExecutionOutcome::success("done"))
        }
    }

    #[tokio::test]
    async fn test_concurrency_cap() {
        let executor = Arc::new(SlowExecutor {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let policy = ExecutionPolicy::default().with_max_concurrent(2);
        let dispatcher = DispatchToolUseCase::with_policy(test_catalog(), executor.clone(), policy);

        let args = json!({});
        let calls = (0..6).map(|_| dispatcher.dispatch("list-pods", &args));
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(|r| r.content == "done"));
        assert_eq!(executor.peak.load(Ordering::SeqCst), 2);
    }
}
