/// Append-only audit trail of administrative decisions
use crate::error::ConsoleResult;
use crate::metrics;
use crate::model::{AdminAction, AdminActionKind};
use crate::store::{
    self, fetch_ordered_with_fallback, server_timestamp, Direction, DocumentStore,
};
use serde_json::{json, Map};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Page size for the recent-actions view when the caller gives none
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn DocumentStore>,
}

impl AuditLog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Deterministic id for one administrative decision. Replaying the
    /// same decision yields the same id, which is what makes `record`
    /// safe to retry.
    pub fn op_id(
        action: AdminActionKind,
        target_user_id: &str,
        admin_id: &str,
        details: &str,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(action.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(target_user_id.as_bytes());
        hasher.update(b"|");
        hasher.update(admin_id.as_bytes());
        hasher.update(b"|");
        hasher.update(details.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Append one entry unless the same operation id is already recorded
    pub async fn record(
        &self,
        admin_id: &str,
        target_user_id: &str,
        action: AdminActionKind,
        details: &str,
    ) -> ConsoleResult<()> {
        let op_id = Self::op_id(action, target_user_id, admin_id, details);

        let existing = self
            .store
            .fetch_where(store::ADMIN_ACTIONS, "opId", &json!(op_id))
            .await?;
        if !existing.is_empty() {
            tracing::debug!(%op_id, "Audit entry already recorded, skipping");
            metrics::record_audit_append("deduplicated");
            return Ok(());
        }

        let mut fields = Map::new();
        fields.insert("adminId".to_string(), json!(admin_id));
        fields.insert("targetUserId".to_string(), json!(target_user_id));
        fields.insert("action".to_string(), json!(action.as_str()));
        fields.insert("details".to_string(), json!(details));
        fields.insert("opId".to_string(), json!(op_id));
        fields.insert("createdAt".to_string(), server_timestamp());

        self.store.append(store::ADMIN_ACTIONS, fields).await?;
        metrics::record_audit_append("written");
        Ok(())
    }

    /// Newest entries first, capped at `limit`
    pub async fn recent(&self, limit: Option<usize>) -> ConsoleResult<Vec<AdminAction>> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let docs = fetch_ordered_with_fallback(
            self.store.as_ref(),
            store::ADMIN_ACTIONS,
            "createdAt",
            Direction::Descending,
            Some(limit),
        )
        .await?;
        Ok(store::decode_documents(&docs, store::ADMIN_ACTIONS))
    }
}
