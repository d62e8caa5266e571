//! SQLite usage store.
//!
//! One `api_usage` row per successful completion. The table is created on
//! open, so a fresh path needs no setup.

use super::UsageStoreError;
use agentm_application::UsageRecorder;
use agentm_domain::{UsageRecord, UsageSummary};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS api_usage (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    model TEXT NOT NULL,
    prompt_tokens INTEGER NOT NULL,
    completion_tokens INTEGER NOT NULL,
    total_tokens INTEGER NOT NULL,
    price_per_prompt_token REAL NOT NULL,
    price_per_completion_token REAL NOT NULL,
    total_cost REAL NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_api_usage_session ON api_usage(session_id);
"#;

pub struct SqliteUsageStore {
    conn: Mutex<Connection>,
}

impl SqliteUsageStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, UsageStoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening usage database at {:?}", path);
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        Self::with_connection(conn)
    }

    /// In-memory store (for testing)
    pub fn in_memory() -> Result<Self, UsageStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, UsageStoreError> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn insert(&self, record: &UsageRecord) -> Result<(), UsageStoreError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let conn = self.conn.lock().map_err(|_| UsageStoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO api_usage (session_id, model, prompt_tokens, completion_tokens, \
             total_tokens, price_per_prompt_token, price_per_completion_token, total_cost, \
             timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.session_id,
                record.model,
                record.prompt_tokens as i64,
                record.completion_tokens as i64,
                record.total_tokens as i64,
                record.price_per_prompt_token,
                record.price_per_completion_token,
                record.total_cost,
                timestamp,
            ],
        )?;
        debug!(
            session_id = %record.session_id,
            total_tokens = record.total_tokens,
            "Usage recorded"
        );
        Ok(())
    }

    /// Totals for `session_id`, or across every session when `None`.
    pub fn summary(&self, session_id: Option<&str>) -> Result<UsageSummary, UsageStoreError> {
        let conn = self.conn.lock().map_err(|_| UsageStoreError::Poisoned)?;
        let row = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(prompt_tokens), 0), \
                 COALESCE(SUM(completion_tokens), 0), COALESCE(SUM(total_tokens), 0), \
                 COALESCE(SUM(total_cost), 0.0) \
                 FROM api_usage WHERE ?1 IS NULL OR session_id = ?1",
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                },
            )
            .optional()?;

        let (requests, prompt, completion, total, cost) = row.unwrap_or_default();
        Ok(UsageSummary {
            session_id: session_id.map(str::to_string),
            requests: requests as u64,
            prompt_tokens: prompt as u64,
            completion_tokens: completion as u64,
            total_tokens: total as u64,
            total_cost: cost,
        })
    }

    /// Distinct session ids, most recent first.
    pub fn sessions(&self) -> Result<Vec<String>, UsageStoreError> {
        let conn = self.conn.lock().map_err(|_| UsageStoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT session_id FROM api_usage GROUP BY session_id ORDER BY MAX(id) DESC",
        )?;
        let sessions = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }
}

impl UsageRecorder for SqliteUsageStore {
    fn record_usage(&self, record: &UsageRecord) {
        if let Err(e) = self.insert(record) {
            warn!("Failed to record usage for session {}: {}", record.session_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentm_domain::{ModelPricing, TokenUsage};

    fn record(session: &str, prompt: u64, completion: u64) -> UsageRecord {
        let pricing = ModelPricing::new("gpt-4o-mini", 0.001, 0.002);
        UsageRecord::new(
            session,
            "gpt-4o-mini",
            TokenUsage::new(prompt, completion),
            Some(&pricing),
        )
    }

    #[test]
    fn test_records_are_summed_per_session() {
        let store = SqliteUsageStore::in_memory().unwrap();
        store.record_usage(&record("s1", 10, 5));
        store.record_usage(&record("s1", 20, 10));
        store.record_usage(&record("s2", 1, 1));

        let summary = store.summary(Some("s1")).unwrap();
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.prompt_tokens, 30);
        assert_eq!(summary.completion_tokens, 15);
        assert_eq!(summary.total_tokens, 45);
        assert!((summary.total_cost - 0.06).abs() < 1e-9);

        let all = store.summary(None).unwrap();
        assert_eq!(all.requests, 3);
        assert!(all.session_id.is_none());
    }

    #[test]
    fn test_empty_summary() {
        let store = SqliteUsageStore::in_memory().unwrap();
        let summary = store.summary(Some("missing")).unwrap();
        assert_eq!(summary.requests, 0);
        assert_eq!(summary.total_cost, 0.0);
    }

    #[test]
    fn test_sessions_most_recent_first() {
        let store = SqliteUsageStore::in_memory().unwrap();
        store.record_usage(&record("old", 1, 1));
        store.record_usage(&record("new", 1, 1));
        assert_eq!(store.sessions().unwrap(), vec!["new", "old"]);
    }

    #[test]
    fn test_open_creates_file_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("usage.db");

        {
            let store = SqliteUsageStore::open(&path).unwrap();
            store.record_usage(&record("s1", 3, 4));
        }

        let reopened = SqliteUsageStore::open(&path).unwrap();
        assert_eq!(reopened.summary(Some("s1")).unwrap().total_tokens, 7);
    }
}
