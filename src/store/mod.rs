/// Document store port
///
/// All persistent marketplace state (users, bookings, disputes, the admin
/// audit trail) lives in a structured document store. The console composes
/// single calls against this trait and never assumes transactions.
/// Supports multiple backend implementations (SQLite, in-memory).

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{ConsoleError, ConsoleResult};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Collection names used by the console
pub const USERS: &str = "users";
pub const BOOKINGS: &str = "bookings";
pub const DISPUTES: &str = "disputes";
pub const ADMIN_ACTIONS: &str = "adminActions";

/// Sort direction for ordered fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One stored document: backend-assigned id plus JSON body
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    /// Decode the body into a typed record, injecting the document id
    /// under the `id` key (the id lives outside the body, as in the
    /// managed store this trait is modelled on)
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> ConsoleResult<T> {
        let mut body = self.body.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".to_string(), Value::String(self.id.clone()));
        }
        serde_json::from_value(body).map_err(|e| {
            ConsoleError::InvalidArgument(format!("Malformed document {}: {}", self.id, e))
        })
    }
}

/// Sentinel field value replaced with the backend's clock (RFC 3339) when
/// the write is applied
pub fn server_timestamp() -> Value {
    json!({ "$serverTimestamp": true })
}

fn is_server_timestamp(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.len() == 1 && o.get("$serverTimestamp").and_then(Value::as_bool) == Some(true))
        .unwrap_or(false)
}

/// Storage backend trait
///
/// `update` merges fields into an existing document; dotted keys address
/// nested fields (`profile.cnicVerified`). `fetch_where` matches top-level
/// field equality only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in append order
    async fn fetch_all(&self, collection: &str) -> ConsoleResult<Vec<Document>>;

    /// Point read by document id
    async fn fetch_one(&self, collection: &str, id: &str) -> ConsoleResult<Option<Document>>;

    /// Documents whose top-level `field` equals `value`
    async fn fetch_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> ConsoleResult<Vec<Document>>;

    /// Server-side ordered fetch; backends without field indexes return
    /// `ConsoleError::OrderUnsupported`
    async fn fetch_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
        limit: Option<usize>,
    ) -> ConsoleResult<Vec<Document>>;

    /// Merge fields into an existing document; `NotFound` when absent
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> ConsoleResult<()>;

    /// Insert a new document under a generated id
    async fn append(&self, collection: &str, fields: Map<String, Value>) -> ConsoleResult<String>;

    /// Cheap connectivity probe for the health endpoint
    async fn ping(&self) -> ConsoleResult<()>;
}

/// Ordered fetch with an explicit fallback path: ask the backend to order;
/// when it reports `OrderUnsupported`, fetch everything and sort locally.
/// Any other error propagates untouched.
pub async fn fetch_ordered_with_fallback(
    store: &dyn DocumentStore,
    collection: &str,
    field: &str,
    direction: Direction,
    limit: Option<usize>,
) -> ConsoleResult<Vec<Document>> {
    match store.fetch_ordered(collection, field, direction, limit).await {
        Ok(docs) => Ok(docs),
        Err(ConsoleError::OrderUnsupported { .. }) => {
            tracing::debug!(collection, field, "Backend cannot order, sorting locally");
            crate::metrics::record_order_fallback(collection);
            let mut docs = store.fetch_all(collection).await?;
            sort_documents(&mut docs, field, direction);
            if let Some(limit) = limit {
                docs.truncate(limit);
            }
            Ok(docs)
        }
        Err(e) => Err(e),
    }
}

/// Decode documents into typed records, skipping any that fail to decode.
/// Malformed documents are logged and dropped, never fatal for a listing.
pub fn decode_documents<T: serde::de::DeserializeOwned>(
    docs: &[Document],
    collection: &str,
) -> Vec<T> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.decode::<T>() {
            Ok(record) => out.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} document {}: {}", collection, doc.id, e)
            }
        }
    }
    out
}

/// Fetch a whole collection and decode it with the skip policy above
pub async fn decode_collection<T: serde::de::DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> ConsoleResult<Vec<T>> {
    let docs = store.fetch_all(collection).await?;
    Ok(decode_documents(&docs, collection))
}

/// Local sort over a string field. RFC 3339 timestamps compare correctly
/// as strings; documents missing the field sort last either direction.
fn sort_documents(docs: &mut [Document], field: &str, direction: Direction) {
    docs.sort_by(|a, b| {
        let ka = a.body.get(field).and_then(Value::as_str);
        let kb = b.body.get(field).and_then(Value::as_str);
        match (ka, kb) {
            (Some(x), Some(y)) => match direction {
                Direction::Ascending => x.cmp(y),
                Direction::Descending => y.cmp(x),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Merge an update's fields into a document body, resolving server
/// timestamp sentinels against `now` and walking dotted paths
pub(crate) fn apply_fields(body: &mut Value, fields: &Map<String, Value>, now: &str) {
    if !body.is_object() {
        *body = Value::Object(Map::new());
    }
    if let Some(map) = body.as_object_mut() {
        for (path, value) in fields {
            let resolved = if is_server_timestamp(value) {
                Value::String(now.to_string())
            } else {
                value.clone()
            };
            insert_path(map, path, resolved);
        }
    }
}

fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Some(child_map) = child.as_object_mut() {
                insert_path(child_map, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_timestamp_sentinel() {
        assert!(is_server_timestamp(&server_timestamp()));
        assert!(!is_server_timestamp(&json!("2026-01-01T00:00:00Z")));
        assert!(!is_server_timestamp(&json!({ "$serverTimestamp": false })));
    }

    #[test]
    fn test_apply_fields_resolves_sentinels_and_paths() {
        let mut body = json!({
            "status": "pending",
            "profile": { "fullName": "Ali Khan", "cnicVerified": false }
        });
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!("approved"));
        fields.insert("profile.cnicVerified".to_string(), json!(true));
        fields.insert("updatedAt".to_string(), server_timestamp());

        apply_fields(&mut body, &fields, "2026-07-01T12:00:00+00:00");

        assert_eq!(body["status"], json!("approved"));
        assert_eq!(body["profile"]["cnicVerified"], json!(true));
        assert_eq!(body["profile"]["fullName"], json!("Ali Khan"));
        assert_eq!(body["updatedAt"], json!("2026-07-01T12:00:00+00:00"));
    }

    #[test]
    fn test_sort_documents_missing_field_last() {
        let mut docs = vec![
            Document {
                id: "a".into(),
                body: json!({ "createdAt": "2026-01-01T00:00:00Z" }),
            },
            Document {
                id: "b".into(),
                body: json!({}),
            },
            Document {
                id: "c".into(),
                body: json!({ "createdAt": "2026-03-01T00:00:00Z" }),
            },
        ];

        sort_documents(&mut docs, "createdAt", Direction::Descending);
        let order: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        sort_documents(&mut docs, "createdAt", Direction::Ascending);
        let order: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_decode_injects_document_id() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: String,
            n: i64,
        }

        let doc = Document {
            id: "doc-7".into(),
            body: json!({ "n": 7 }),
        };
        let row: Row = doc.decode().unwrap();
        assert_eq!(row.id, "doc-7");
        assert_eq!(row.n, 7);
    }
}
