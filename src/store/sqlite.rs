/// SQLite rendering of the document store
///
/// Every collection shares one `documents` table; bodies are JSON text and
/// filters/ordering go through `json_extract`, so this backend orders
/// server-side and never triggers the local-sort fallback.
use crate::error::{ConsoleError, ConsoleResult};
use crate::store::{apply_fields, Direction, Document, DocumentStore};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the on-disk store
    pub async fn open(path: &Path) -> ConsoleResult<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .foreign_keys(true)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

        let store = Self { db: pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Fresh in-memory store, used by tests. A single pooled connection,
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> ConsoleResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;
        let store = Self { db: pool };
        store.bootstrap().await?;
        Ok(store)
    }

    async fn bootstrap(&self) -> ConsoleResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection)",
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    fn parse_row(row: SqliteRow) -> ConsoleResult<Document> {
        let id: String = row.get("id");
        let raw: String = row.get("body");
        let body: Value = serde_json::from_str(&raw)
            .map_err(|e| ConsoleError::Internal(format!("Corrupt document body {}: {}", id, e)))?;
        Ok(Document { id, body })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn fetch_all(&self, collection: &str) -> ConsoleResult<Vec<Document>> {
        let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid")
            .bind(collection)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Self::parse_row).collect()
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> ConsoleResult<Option<Document>> {
        let row = sqlx::query("SELECT id, body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(Self::parse_row).transpose()
    }

    async fn fetch_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> ConsoleResult<Vec<Document>> {
        let sql = r#"
            SELECT id, body FROM documents
            WHERE collection = ? AND json_extract(body, '$.' || ?) = ?
            ORDER BY rowid
        "#;
        let query = sqlx::query(sql).bind(collection).bind(field);

        let rows = match value {
            Value::String(s) => query.bind(s).fetch_all(&self.db).await?,
            Value::Bool(b) => query.bind(*b).fetch_all(&self.db).await?,
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i).fetch_all(&self.db).await?,
                None => {
                    query
                        .bind(n.as_f64().unwrap_or(0.0))
                        .fetch_all(&self.db)
                        .await?
                }
            },
            other => {
                return Err(ConsoleError::InvalidArgument(format!(
                    "Unsupported filter value: {}",
                    other
                )))
            }
        };

        rows.into_iter().map(Self::parse_row).collect()
    }

    async fn fetch_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
        limit: Option<usize>,
    ) -> ConsoleResult<Vec<Document>> {
        let order = match direction {
            Direction::Ascending => "ASC NULLS LAST",
            Direction::Descending => "DESC NULLS LAST",
        };
        let sql = format!(
            r#"
            SELECT id, body FROM documents
            WHERE collection = ?
            ORDER BY json_extract(body, '$.' || ?) {}
            LIMIT ?
            "#,
            order
        );

        let rows = sqlx::query(&sql)
            .bind(collection)
            .bind(field)
            .bind(limit.map(|l| l as i64).unwrap_or(-1))
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Self::parse_row).collect()
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ConsoleResult<()> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        let raw: String = match row {
            Some(row) => row.get("body"),
            None => {
                return Err(ConsoleError::NotFound(format!(
                    "Document {}/{} not found",
                    collection, id
                )))
            }
        };
        let mut body: Value = serde_json::from_str(&raw)
            .map_err(|e| ConsoleError::Internal(format!("Corrupt document body {}: {}", id, e)))?;

        let now = Utc::now().to_rfc3339();
        apply_fields(&mut body, &fields, &now);

        sqlx::query("UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND id = ?")
            .bind(body.to_string())
            .bind(&now)
            .bind(collection)
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn append(&self, collection: &str, fields: Map<String, Value>) -> ConsoleResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let mut body = Value::Object(Map::new());
        apply_fields(&mut body, &fields, &now);

        sqlx::query("INSERT INTO documents (collection, id, body, updated_at) VALUES (?, ?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(body.to_string())
            .bind(&now)
            .execute(&self.db)
            .await?;

        Ok(id)
    }

    async fn ping(&self) -> ConsoleResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
