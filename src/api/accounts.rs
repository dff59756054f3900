/// Account directory and lifecycle endpoints
use crate::{
    auth::AdminContext,
    context::AppContext,
    error::ConsoleResult,
    model::{Account, AccountRole, AccountStatus},
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build account routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        // Directory
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", get(get_user))
        // Lifecycle decisions
        .route("/admin/users/:id/approve", post(approve_user))
        .route("/admin/users/:id/reject", post(reject_user))
        .route("/admin/users/:id/suspend", post(suspend_user))
}

#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Serialize)]
struct UsersResponse {
    users: Vec<Account>,
}

/// List accounts, optionally filtered by status or role.
/// Status takes precedence when both filters are present.
async fn list_users(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
    Query(query): Query<ListUsersQuery>,
) -> ConsoleResult<Json<UsersResponse>> {
    let users = match (query.status.as_deref(), query.role.as_deref()) {
        (Some(status), _) => {
            ctx.directory
                .list_by_status(AccountStatus::from_str(status)?)
                .await?
        }
        (None, Some(role)) => {
            ctx.directory
                .list_by_role(AccountRole::from_str(role)?)
                .await?
        }
        (None, None) => ctx.directory.list_all().await?,
    };
    Ok(Json(UsersResponse { users }))
}

/// Fetch a single account by id
async fn get_user(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
    Path(id): Path<String>,
) -> ConsoleResult<Json<Account>> {
    let account = ctx.directory.get(&id).await?;
    Ok(Json(account))
}

#[derive(Debug, Deserialize)]
struct ReasonRequest {
    reason: String,
}

/// Approve a pending registration
async fn approve_user(
    State(ctx): State<AppContext>,
    auth: AdminContext,
    Path(id): Path<String>,
) -> ConsoleResult<Json<Account>> {
    let account = ctx.lifecycle.approve(&auth.principal, &id).await?;
    Ok(Json(account))
}

/// Reject a pending registration with a reason
async fn reject_user(
    State(ctx): State<AppContext>,
    auth: AdminContext,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> ConsoleResult<Json<Account>> {
    let account = ctx
        .lifecycle
        .reject(&auth.principal, &id, &req.reason)
        .await?;
    Ok(Json(account))
}

/// Suspend an approved account with a reason
async fn suspend_user(
    State(ctx): State<AppContext>,
    auth: AdminContext,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> ConsoleResult<Json<Account>> {
    let account = ctx
        .lifecycle
        .suspend(&auth.principal, &id, &req.reason)
        .await?;
    Ok(Json(account))
}
