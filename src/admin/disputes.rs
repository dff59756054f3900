/// Dispute resolution
///
/// Disputes are filed by marketplace users against a booking; the console
/// only ever moves them from open to resolved, attaching the resolution
/// text and an audit entry.
use crate::admin::audit::AuditLog;
use crate::auth::AdminPrincipal;
use crate::error::{ConsoleError, ConsoleResult};
use crate::metrics;
use crate::model::{AdminActionKind, Dispute, DisputeStatus};
use crate::store::{
    self, decode_documents, fetch_ordered_with_fallback, server_timestamp, Direction,
    DocumentStore,
};
use serde_json::{json, Map};
use std::sync::Arc;

#[derive(Clone)]
pub struct DisputeResolver {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl DisputeResolver {
    pub fn new(store: Arc<dyn DocumentStore>, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    /// All disputes, or only those in one status, newest first
    pub async fn list(&self, status: Option<DisputeStatus>) -> ConsoleResult<Vec<Dispute>> {
        let mut disputes: Vec<Dispute> = match status {
            None => {
                let docs = fetch_ordered_with_fallback(
                    self.store.as_ref(),
                    store::DISPUTES,
                    "createdAt",
                    Direction::Descending,
                    None,
                )
                .await?;
                decode_documents(&docs, store::DISPUTES)
            }
            Some(status) => {
                let docs = self
                    .store
                    .fetch_where(store::DISPUTES, "status", &json!(status.as_str()))
                    .await?;
                decode_documents(&docs, store::DISPUTES)
            }
        };
        // Filtered fetches come back unordered
        disputes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(disputes)
    }

    /// Resolve an open dispute with the given resolution text
    pub async fn resolve(
        &self,
        principal: &AdminPrincipal,
        dispute_id: &str,
        resolution: &str,
    ) -> ConsoleResult<Dispute> {
        let resolution = resolution.trim();
        if resolution.is_empty() {
            return Err(ConsoleError::InvalidArgument(
                "Resolution text must not be blank".to_string(),
            ));
        }

        let dispute = self.load(dispute_id).await?;
        if dispute.status != DisputeStatus::Open {
            return Err(ConsoleError::InvalidState(format!(
                "Cannot resolve dispute {} in status {}",
                dispute_id,
                dispute.status.as_str()
            )));
        }

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(DisputeStatus::Resolved.as_str()));
        fields.insert("resolution".to_string(), json!(resolution));
        fields.insert("resolvedAt".to_string(), server_timestamp());
        self.store.update(store::DISPUTES, dispute_id, fields).await?;

        self.audit
            .record(
                &principal.admin_id,
                dispute_id,
                AdminActionKind::ResolveDispute,
                &format!("Dispute resolved: {}", resolution),
            )
            .await?;
        metrics::record_dispute_resolved();
        tracing::info!(dispute_id, admin = %principal.admin_id, "Dispute resolved");

        self.load(dispute_id).await
    }

    async fn load(&self, dispute_id: &str) -> ConsoleResult<Dispute> {
        let doc = self
            .store
            .fetch_one(store::DISPUTES, dispute_id)
            .await?
            .ok_or_else(|| ConsoleError::NotFound(format!("Dispute {} not found", dispute_id)))?;
        doc.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn resolver() -> (Arc<MemoryStore>, DisputeResolver) {
        let store = Arc::new(MemoryStore::new());
        let audit = AuditLog::new(store.clone());
        (store.clone(), DisputeResolver::new(store, audit))
    }

    fn admin() -> AdminPrincipal {
        AdminPrincipal {
            admin_id: "a1".to_string(),
            email: "admin@kaarigar360.com".to_string(),
        }
    }

    async fn seed_dispute(store: &MemoryStore, id: &str, status: &str, stamp: &str) {
        store
            .put(
                store::DISPUTES,
                id,
                json!({
                    "bookingId": "b1",
                    "reporterId": "u1",
                    "reportedUserId": "u2",
                    "type": "payment",
                    "description": "Worker was never paid",
                    "status": status,
                    "createdAt": stamp
                }),
            )
            .await;
    }

    #[tokio::test]
    async fn test_resolve_open_dispute() {
        let (store, resolver) = resolver();
        seed_dispute(&store, "d1", "open", "2026-05-01T08:00:00+00:00").await;

        let dispute = resolver
            .resolve(&admin(), "d1", "Employer paid in full")
            .await
            .unwrap();

        assert_eq!(dispute.status, DisputeStatus::Resolved);
        assert_eq!(dispute.resolution.as_deref(), Some("Employer paid in full"));
        assert!(dispute.resolved_at.is_some());

        let actions = store.fetch_all(store::ADMIN_ACTIONS).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].body["action"], json!("resolve_dispute"));
        assert_eq!(actions[0].body["targetUserId"], json!("d1"));
        assert_eq!(
            actions[0].body["details"],
            json!("Dispute resolved: Employer paid in full")
        );
    }

    #[tokio::test]
    async fn test_resolve_requires_open_status() {
        let (store, resolver) = resolver();
        seed_dispute(&store, "d2", "investigating", "2026-05-01T08:00:00+00:00").await;
        seed_dispute(&store, "d3", "resolved", "2026-05-02T08:00:00+00:00").await;

        for id in ["d2", "d3"] {
            let err = resolver.resolve(&admin(), id, "done").await.unwrap_err();
            assert!(matches!(err, ConsoleError::InvalidState(_)));
        }
        assert!(store.fetch_all(store::ADMIN_ACTIONS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_blank_resolution_rejected() {
        let (store, resolver) = resolver();
        seed_dispute(&store, "d4", "open", "2026-05-01T08:00:00+00:00").await;

        let err = resolver.resolve(&admin(), "d4", "  ").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidArgument(_)));

        let doc = store.fetch_one(store::DISPUTES, "d4").await.unwrap().unwrap();
        assert_eq!(doc.body["status"], json!("open"));
    }

    #[tokio::test]
    async fn test_resolve_missing_dispute() {
        let (_, resolver) = resolver();
        let err = resolver.resolve(&admin(), "ghost", "done").await.unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (store, resolver) = resolver();
        seed_dispute(&store, "d1", "open", "2026-05-01T08:00:00+00:00").await;
        seed_dispute(&store, "d2", "resolved", "2026-05-03T08:00:00+00:00").await;
        seed_dispute(&store, "d3", "open", "2026-05-02T08:00:00+00:00").await;

        let all = resolver.list(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d3", "d1"]);

        let open = resolver.list(Some(DisputeStatus::Open)).await.unwrap();
        let ids: Vec<&str> = open.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d3", "d1"]);
    }
}
