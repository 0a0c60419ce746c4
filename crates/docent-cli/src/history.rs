//! SQLite-backed history of extractions.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use docent_core::ExtractionRecord;

/// Store for [`ExtractionRecord`]s.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

/// Default database location in the user data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docent")
        .join("history.db")
}

impl HistoryStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Could not open history database {}", path.display()))?;
        debug!("Opened history database at {}", path.display());
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS extractions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_type TEXT NOT NULL,
                filename TEXT NOT NULL,
                extracted_text TEXT NOT NULL,
                provider TEXT NOT NULL,
                model TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_extractions_created_at ON extractions(created_at);
            ",
        )
        .context("Could not initialize history schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("history database lock poisoned"))
    }

    /// Insert a record and return its id.
    pub fn insert(&self, record: &ExtractionRecord) -> anyhow::Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO extractions (document_type, filename, extracted_text, provider, model, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.document_type,
                record.filename,
                record.extracted_text,
                record.provider,
                record.model,
                record.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent records first.
    pub fn list(&self, limit: usize) -> anyhow::Result<Vec<ExtractionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document_type, filename, extracted_text, provider, model, created_at
             FROM extractions ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get(&self, id: i64) -> anyhow::Result<Option<ExtractionRecord>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, document_type, filename, extracted_text, provider, model, created_at
             FROM extractions WHERE id = ?1",
            params![id],
            record_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Delete a record. Returns false if it did not exist.
    pub fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM extractions WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ExtractionRecord> {
    Ok(ExtractionRecord {
        id: Some(row.get(0)?),
        document_type: row.get(1)?,
        filename: row.get(2)?,
        extracted_text: row.get(3)?,
        provider: row.get(4)?,
        model: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docent_core::extraction::normalize_at;
    use docent_core::DocumentType;
    use pretty_assertions::assert_eq;

    fn record(filename: &str, day: u32) -> ExtractionRecord {
        let at = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let result = normalize_at(Some("Total Amount: 12.50"), at);
        ExtractionRecord::at(DocumentType::Receipt, filename, &result, "OpenAI", "gpt-4o", at)
    }

    #[test]
    fn test_insert_and_get() {
        let store = HistoryStore::open_in_memory().unwrap();
        let id = store.insert(&record("receipt.jpg", 1)).unwrap();

        let loaded = store.get(id).unwrap().unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.filename, "receipt.jpg");
        assert_eq!(loaded.document_type, "Receipt");
        assert_eq!(loaded.extracted_text, "Total Amount: 12.50");
        assert_eq!(loaded.created_at, "2024-03-01T09:00:00.000000");
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.insert(&record("a.png", 1)).unwrap();
        store.insert(&record("b.png", 3)).unwrap();
        store.insert(&record("c.png", 2)).unwrap();

        let names: Vec<String> = store
            .list(2)
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["b.png", "c.png"]);
    }

    #[test]
    fn test_delete() {
        let store = HistoryStore::open_in_memory().unwrap();
        let id = store.insert(&record("a.png", 1)).unwrap();

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");

        let store = HistoryStore::open(&path).unwrap();
        store.insert(&record("a.png", 1)).unwrap();
        assert!(path.exists());
    }
}
