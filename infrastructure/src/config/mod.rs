//! Configuration file loading for agentm
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENTM_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agentm.toml` or `./.agentm.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agentm/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentsConfig, FileConfig, FilePricingEntry, FileProviderConfig,
    FileUsageConfig, UsageBackend, default_pricing,
};
pub use loader::ConfigLoader;
