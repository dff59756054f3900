/// In-memory document store
///
/// Collections live in a locked map with no field indexes, so ordered
/// fetches report `OrderUnsupported` and callers take the local-sort
/// fallback. Used by unit tests and demo runs.
use crate::error::{ConsoleError, ConsoleResult};
use crate::store::{apply_fields, Direction, Document, DocumentStore};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a document under a fixed id, replacing any existing body
    pub async fn put(&self, collection: &str, id: &str, body: Value) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => doc.body = body,
            None => docs.push(Document {
                id: id.to_string(),
                body,
            }),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_all(&self, collection: &str) -> ConsoleResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> ConsoleResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn fetch_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> ConsoleResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.body.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_ordered(
        &self,
        collection: &str,
        field: &str,
        _direction: Direction,
        _limit: Option<usize>,
    ) -> ConsoleResult<Vec<Document>> {
        // No indexes here; callers sort locally via the fallback helper
        Err(ConsoleError::OrderUnsupported {
            collection: collection.to_string(),
            field: field.to_string(),
        })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ConsoleResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| {
                ConsoleError::NotFound(format!("Document {}/{} not found", collection, id))
            })?;

        apply_fields(&mut doc.body, &fields, &Utc::now().to_rfc3339());
        Ok(())
    }

    async fn append(&self, collection: &str, fields: Map<String, Value>) -> ConsoleResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut body = Value::Object(Map::new());
        apply_fields(&mut body, &fields, &Utc::now().to_rfc3339());

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    async fn ping(&self) -> ConsoleResult<()> {
        Ok(())
    }
}
