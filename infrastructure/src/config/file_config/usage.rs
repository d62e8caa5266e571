//! Usage accounting configuration from TOML (`[usage]` section)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where usage records are appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageBackend {
    #[default]
    Sqlite,
    Jsonl,
}

impl fmt::Display for UsageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageBackend::Sqlite => write!(f, "sqlite"),
            UsageBackend::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUsageConfig {
    pub enabled: bool,
    pub backend: UsageBackend,
    /// Store location. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
    /// Session label written with every record. Generated per run when unset.
    pub session_id: Option<String>,
}

impl Default for FileUsageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: UsageBackend::Sqlite,
            path: None,
            session_id: None,
        }
    }
}

impl FileUsageConfig {
    /// Store path, falling back to `$XDG_DATA_HOME/agentm/usage.{db,jsonl}`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        let file = match self.backend {
            UsageBackend::Sqlite => "usage.db",
            UsageBackend::Jsonl => "usage.jsonl",
        };
        dirs::data_dir().map(|d| d.join("agentm").join(file))
    }
}
