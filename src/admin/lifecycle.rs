/// Registration lifecycle decisions
///
/// State machine per non-admin account: pending -> approved (approval also
/// marks the CNIC verified), pending -> rejected, approved -> suspended.
/// Nothing leaves rejected or suspended. Every successful decision appends
/// exactly one audit entry.
use crate::admin::audit::AuditLog;
use crate::auth::AdminPrincipal;
use crate::error::{ConsoleError, ConsoleResult};
use crate::metrics;
use crate::model::{Account, AccountStatus, AdminActionKind};
use crate::store::{self, server_timestamp, DocumentStore};
use serde_json::{json, Map};
use std::sync::Arc;

#[derive(Clone)]
pub struct LifecycleEngine {
    store: Arc<dyn DocumentStore>,
    audit: AuditLog,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn DocumentStore>, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    /// Approve a pending registration and mark its CNIC verified
    pub async fn approve(
        &self,
        principal: &AdminPrincipal,
        user_id: &str,
    ) -> ConsoleResult<Account> {
        let account = self.load(user_id).await?;
        require_status(&account, AccountStatus::Pending, "approve")?;

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(AccountStatus::Approved.as_str()));
        fields.insert("profile.cnicVerified".to_string(), json!(true));
        fields.insert("updatedAt".to_string(), server_timestamp());
        self.store.update(store::USERS, user_id, fields).await?;

        self.audit
            .record(
                &principal.admin_id,
                user_id,
                AdminActionKind::ApproveUser,
                "User approved and CNIC verified",
            )
            .await?;
        metrics::record_lifecycle_decision(AdminActionKind::ApproveUser.as_str());
        tracing::info!(user_id, admin = %principal.admin_id, "Account approved");

        self.load(user_id).await
    }

    /// Reject a pending registration. The reason is mandatory and lands
    /// verbatim in the audit trail.
    pub async fn reject(
        &self,
        principal: &AdminPrincipal,
        user_id: &str,
        reason: &str,
    ) -> ConsoleResult<Account> {
        let reason = non_blank(reason, "Rejection reason")?;
        let account = self.load(user_id).await?;
        require_status(&account, AccountStatus::Pending, "reject")?;

        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(AccountStatus::Rejected.as_str()));
        fields.insert("updatedAt".to_string(), server_timestamp());
        self.store.update(store::USERS, user_id, fields).await?;

        self.audit
            .record(
                &principal.admin_id,
                user_id,
                AdminActionKind::RejectUser,
                &format!("User rejected: {}", reason),
            )
            .await?;
        metrics::record_lifecycle_decision(AdminActionKind::RejectUser.as_str());
        tracing::info!(user_id, admin = %principal.admin_id, "Account rejected");

        self.load(user_id).await
    }

    /// Suspend an approved account. Pending accounts cannot be suspended;
    /// reject them instead.
    pub async fn suspend(
        &self,
        principal: &AdminPrincipal,
        user_id: &str,
        reason: &str,
    ) -> ConsoleResult<Account> {
        let reason = non_blank(reason, "Suspension reason")?;
        let account = self.load(user_id).await?;
        require_status(&account, AccountStatus::Approved, "suspend")?;

        let mut fields = Map::new();
        fields.insert(
            "status".to_string(),
            json!(AccountStatus::Suspended.as_str()),
        );
        fields.insert("updatedAt".to_string(), server_timestamp());
        self.store.update(store::USERS, user_id, fields).await?;

        self.audit
            .record(
                &principal.admin_id,
                user_id,
                AdminActionKind::SuspendUser,
                &format!("User suspended: {}", reason),
            )
            .await?;
        metrics::record_lifecycle_decision(AdminActionKind::SuspendUser.as_str());
        tracing::info!(user_id, admin = %principal.admin_id, "Account suspended");

        self.load(user_id).await
    }

    async fn load(&self, user_id: &str) -> ConsoleResult<Account> {
        let doc = self
            .store
            .fetch_one(store::USERS, user_id)
            .await?
            .ok_or_else(|| ConsoleError::NotFound(format!("User {} not found", user_id)))?;
        doc.decode()
    }
}

fn require_status(account: &Account, expected: AccountStatus, verb: &str) -> ConsoleResult<()> {
    if account.status != expected {
        return Err(ConsoleError::InvalidState(format!(
            "Cannot {} user {} in status {}",
            verb,
            account.id,
            account.status.as_str()
        )));
    }
    Ok(())
}

fn non_blank<'a>(value: &'a str, what: &str) -> ConsoleResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::InvalidArgument(format!(
            "{} must not be blank",
            what
        )));
    }
    Ok(trimmed)
}
