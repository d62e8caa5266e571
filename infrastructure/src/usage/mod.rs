//! Usage accounting stores implementing the `UsageRecorder` port.

mod jsonl_store;
mod sqlite_store;

pub use jsonl_store::JsonlUsageStore;
pub use sqlite_store::SqliteUsageStore;

use thiserror::Error;

/// Errors raised while opening or writing a usage store
#[derive(Error, Debug)]
pub enum UsageStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Usage store lock poisoned")]
    Poisoned,
}
