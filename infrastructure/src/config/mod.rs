//! Configuration file loading for kubegate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `KUBEGATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./kubegate.toml` or `./.kubegate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/kubegate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigError, FileConfig, FileExecutorConfig, FileProgramsConfig};
pub use loader::{ConfigLoader, ENV_PREFIX};
