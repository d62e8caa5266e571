//! JSONL file writer for usage records.
//!
//! Each [`UsageRecord`] is serialized as a single JSON line with a
//! `timestamp` field, appended to the file via a buffered writer.

use super::UsageStoreError;
use agentm_application::UsageRecorder;
use agentm_domain::UsageRecord;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL usage store.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record.
pub struct JsonlUsageStore {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlUsageStore {
    /// Open `path` for appending, creating the file and parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UsageStoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &UsageRecord) -> Result<(), UsageStoreError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut value = serde_json::to_value(record)?;
        if let Value::Object(map) = &mut value {
            map.insert("timestamp".to_string(), Value::String(timestamp));
        }
        let line = serde_json::to_string(&value)?;

        let mut writer = self.writer.lock().map_err(|_| UsageStoreError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl UsageRecorder for JsonlUsageStore {
    fn record_usage(&self, record: &UsageRecord) {
        if let Err(e) = self.append(record) {
            warn!(
                "Failed to append usage record to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for JsonlUsageStore {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
