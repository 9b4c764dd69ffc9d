//! CLI entrypoint for kubegate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use kubegate_application::{DispatchToolUseCase, ListToolsUseCase};
use kubegate_infrastructure::{
    ConfigLoader, FileConfig, JsonSchemaToolConverter, TokioProcessExecutor, default_catalog,
    locate_programs,
};
use kubegate_presentation::{Cli, McpServer};
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Bound on waiting for blocking work (the stdin reader) at exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let code = runtime.block_on(run(cli));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

/// Logs go to stderr; stdout carries the protocol.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    info!("Starting kubegate");

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!(
            "{}",
            toml::to_string_pretty(&config).context("failed to render configuration")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let catalog = Arc::new(default_catalog().context("built-in tool table is inconsistent")?);
    let settings = config.executor_settings();

    for located in locate_programs(&settings) {
        match &located.resolved {
            Some(path) => debug!("{} found at {}", located.program, path.display()),
            None => warn!(
                "{} not found (configured as '{}'); calls using it will fail",
                located.program, located.binary
            ),
        }
    }

    let executor = Arc::new(TokioProcessExecutor::new(settings));
    let dispatcher = Arc::new(DispatchToolUseCase::with_policy(
        Arc::clone(&catalog),
        executor,
        config.execution_policy(),
    ));
    let listing = Arc::new(ListToolsUseCase::new(
        Arc::clone(&catalog),
        Arc::new(JsonSchemaToolConverter),
    ));

    if cli.list_tools {
        println!("{}", serde_json::to_string_pretty(&listing.describe_all())?);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(tool) = &cli.call {
        let arguments: Value = match &cli.args {
            Some(raw) => serde_json::from_str(raw).context("--args is not valid JSON")?,
            None => Value::Object(Default::default()),
        };
        let result = dispatcher.dispatch(tool, &arguments).await;
        println!("{}", result.content);
        return Ok(if result.is_error {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C");
            shutdown.cancel();
        }
    });

    info!("Serving {} tools", catalog.len());
    let server = Arc::new(McpServer::new(dispatcher, listing));
    server.serve_stdio(cancel).await?;

    Ok(ExitCode::SUCCESS)
}
