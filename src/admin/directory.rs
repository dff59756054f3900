/// Typed reads over the users collection
use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{Account, AccountRole, AccountStatus};
use crate::store::{
    self, decode_documents, fetch_ordered_with_fallback, Direction, DocumentStore,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn DocumentStore>,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Point read. A malformed body is an error here, unlike in listings:
    /// lifecycle preconditions cannot be checked against a record that
    /// does not decode.
    pub async fn get(&self, user_id: &str) -> ConsoleResult<Account> {
        let doc = self
            .store
            .fetch_one(store::USERS, user_id)
            .await?
            .ok_or_else(|| ConsoleError::NotFound(format!("User {} not found", user_id)))?;
        doc.decode()
    }

    /// Every account, newest registrations first
    pub async fn list_all(&self) -> ConsoleResult<Vec<Account>> {
        let docs = fetch_ordered_with_fallback(
            self.store.as_ref(),
            store::USERS,
            "createdAt",
            Direction::Descending,
            None,
        )
        .await?;
        Ok(decode_documents(&docs, store::USERS))
    }

    /// Accounts in one lifecycle status (the review queue is `pending`)
    pub async fn list_by_status(&self, status: AccountStatus) -> ConsoleResult<Vec<Account>> {
        let docs = self
            .store
            .fetch_where(store::USERS, "status", &json!(status.as_str()))
            .await?;
        let mut accounts: Vec<Account> = decode_documents(&docs, store::USERS);
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    /// Accounts in one role
    pub async fn list_by_role(&self, role: AccountRole) -> ConsoleResult<Vec<Account>> {
        let docs = self
            .store
            .fetch_where(store::USERS, "role", &json!(role.as_str()))
            .await?;
        let mut accounts: Vec<Account> = decode_documents(&docs, store::USERS);
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn seed(store: &MemoryStore, id: &str, role: &str, status: &str, stamp: &str) {
        store
            .put(
                store::USERS,
                id,
                json!({
                    "role": role,
                    "phoneNumber": "+923000000000",
                    "email": format!("{}@example.com", id),
                    "profile": { "fullName": id, "cnicVerified": false },
                    "status": status,
                    "createdAt": stamp
                }),
            )
            .await;
    }

    #[tokio::test]
    async fn test_get_and_not_found() {
        let store = Arc::new(MemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        seed(&store, "u1", "worker", "pending", "2026-01-01T00:00:00+00:00").await;

        let account = directory.get("u1").await.unwrap();
        assert_eq!(account.id, "u1");
        assert_eq!(account.role, AccountRole::Worker);

        let err = directory.get("ghost").await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        seed(&store, "u1", "worker", "pending", "2026-01-01T00:00:00+00:00").await;
        seed(&store, "u2", "employer", "approved", "2026-03-01T00:00:00+00:00").await;
        seed(&store, "u3", "worker", "pending", "2026-02-01T00:00:00+00:00").await;

        let accounts = directory.list_all().await.unwrap();
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u3", "u1"]);
    }

    #[tokio::test]
    async fn test_filters() {
        let store = Arc::new(MemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        seed(&store, "u1", "worker", "pending", "2026-01-01T00:00:00+00:00").await;
        seed(&store, "u2", "employer", "approved", "2026-03-01T00:00:00+00:00").await;
        seed(&store, "u3", "worker", "approved", "2026-02-01T00:00:00+00:00").await;

        let pending = directory.list_by_status(AccountStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "u1");

        let workers = directory.list_by_role(AccountRole::Worker).await.unwrap();
        let ids: Vec<&str> = workers.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u1"]);
    }

    #[tokio::test]
    async fn test_listing_skips_malformed_documents() {
        let store = Arc::new(MemoryStore::new());
        let directory = AccountDirectory::new(store.clone());
        seed(&store, "u1", "worker", "pending", "2026-01-01T00:00:00+00:00").await;
        store
            .put(store::USERS, "broken", json!({ "role": "worker" }))
            .await;

        let accounts = directory.list_all().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "u1");

        let err = directory.get("broken").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidArgument(_)));
    }
}
