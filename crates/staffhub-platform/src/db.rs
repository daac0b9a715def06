//! SQLite document store: local cache and offline store.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use staffhub_core::error::{Result, StaffHubError};
use staffhub_core::traits::DocumentStore;
use staffhub_core::traits::store::{is_collection_path, is_document_path};
use staffhub_core::types::{Document, Fields, WriteOp};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Documents stored as JSON text keyed by their full path.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the store.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StaffHubError::storage(format!("DB open error: {e}")))?;
        let db = Self { conn: Mutex::new(conn) };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(Path::new(":memory:"))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run schema migrations.
    fn migrate(&self) -> Result<()> {
        self.conn().execute_batch("
            CREATE TABLE IF NOT EXISTS documents (
                path TEXT PRIMARY KEY,
                parent TEXT NOT NULL,
                doc_id TEXT NOT NULL,
                data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT DEFAULT (datetime('now')),
                updated_at TEXT DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_documents_parent ON documents(parent, doc_id);
        ").map_err(|e| StaffHubError::storage(format!("Migration error: {e}")))?;
        Ok(())
    }

    /// Number of documents directly inside a collection.
    pub fn count(&self, collection: &str) -> Result<u64> {
        self.conn().query_row(
            "SELECT COUNT(*) FROM documents WHERE parent=?1",
            params![collection],
            |row| row.get::<_, i64>(0),
        ).map(|n| n as u64).map_err(|e| StaffHubError::storage(format!("Count: {e}")))
    }
}

fn split_path(path: &str) -> Result<(&str, &str)> {
    if !is_document_path(path) {
        return Err(StaffHubError::InvalidPath(path.to_string()));
    }
    path.rsplit_once('/').ok_or_else(|| StaffHubError::InvalidPath(path.to_string()))
}

fn upsert(conn: &Connection, path: &str, data: &Fields) -> Result<()> {
    let (parent, id) = split_path(path)?;
    let json = serde_json::to_string(data)?;
    conn.execute(
        "INSERT INTO documents (path, parent, doc_id, data) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(path) DO UPDATE SET data = ?4, updated_at = datetime('now')",
        params![path, parent, id, json],
    ).map_err(|e| StaffHubError::storage(format!("Set document: {e}")))?;
    Ok(())
}

fn remove(conn: &Connection, path: &str) -> Result<()> {
    split_path(path)?;
    conn.execute("DELETE FROM documents WHERE path=?1", params![path])
        .map_err(|e| StaffHubError::storage(format!("Delete document: {e}")))?;
    Ok(())
}

fn decode(path: String, data: String) -> Result<Document> {
    let data: Fields = serde_json::from_str(&data)?;
    Ok(Document::new(path, data))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        split_path(path)?;
        let row = self.conn().query_row(
            "SELECT path, data FROM documents WHERE path=?1",
            params![path],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        ).optional().map_err(|e| StaffHubError::storage(format!("Get document: {e}")))?;

        row.map(|(path, data)| decode(path, data)).transpose()
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        if !is_collection_path(collection) {
            return Err(StaffHubError::InvalidPath(collection.to_string()));
        }
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT path, data FROM documents WHERE parent=?1 ORDER BY doc_id"
        ).map_err(|e| StaffHubError::storage(format!("Prepare: {e}")))?;

        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        }).map_err(|e| StaffHubError::storage(format!("Query: {e}")))?;

        let mut docs = Vec::new();
        for row in rows {
            let (path, data) = row.map_err(|e| StaffHubError::storage(format!("Row: {e}")))?;
            docs.push(decode(path, data)?);
        }
        Ok(docs)
    }

    async fn set_document(&self, path: &str, data: Fields) -> Result<()> {
        upsert(&self.conn(), path, &data)
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        remove(&self.conn(), path)
    }

    async fn commit_batch(&self, writes: Vec<WriteOp>) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()
            .map_err(|e| StaffHubError::storage(format!("Begin batch: {e}")))?;
        for write in &writes {
            match write {
                WriteOp::Set { path, data } => upsert(&tx, path, data)?,
                WriteOp::Delete { path } => remove(&tx, path)?,
            }
        }
        tx.commit().map_err(|e| StaffHubError::storage(format!("Commit batch: {e}")))?;
        tracing::debug!("Committed batch of {} writes", writes.len());
        Ok(())
    }
}
