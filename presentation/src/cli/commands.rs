//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for kubegate
#[derive(Parser, Debug)]
#[command(name = "kubegate")]
#[command(author, version, about = "MCP server exposing kubectl and helm as tools")]
#[command(long_about = r#"
kubegate serves a fixed catalog of kubectl and helm operations over the
Model Context Protocol on stdin/stdout. Every call is validated against the
tool's schema and run as a direct child process, never through a shell.

Configuration files are loaded from (in priority order):
1. KUBEGATE_* environment variables (KUBEGATE_EXECUTOR__MAX_CONCURRENT=4)
2. --config <path>     Explicit config file
3. ./kubegate.toml     Project-level config
4. ~/.config/kubegate/config.toml   Global config

Example:
  kubegate                                   # serve MCP on stdio
  kubegate --list-tools
  kubegate --call list-pods --args '{"namespace": "kube-system"}'
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the tool catalog as JSON and exit
    #[arg(long, conflicts_with = "call")]
    pub list_tools: bool,

    /// Run a single tool call and exit
    #[arg(long, value_name = "TOOL")]
    pub call: Option<String>,

    /// JSON object of arguments for --call
    #[arg(long, value_name = "JSON", requires = "call")]
    pub args: Option<String>,
}

impl Cli {
    /// Default log directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
