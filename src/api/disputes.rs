/// Dispute queue and resolution endpoints
use crate::{
    auth::AdminContext,
    context::AppContext,
    error::ConsoleResult,
    model::{Dispute, DisputeStatus},
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build dispute routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/admin/disputes", get(list_disputes))
        .route("/admin/disputes/:id/resolve", post(resolve_dispute))
}

#[derive(Debug, Deserialize)]
struct ListDisputesQuery {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct DisputesResponse {
    disputes: Vec<Dispute>,
}

/// List disputes, newest first, optionally filtered by status
async fn list_disputes(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
    Query(query): Query<ListDisputesQuery>,
) -> ConsoleResult<Json<DisputesResponse>> {
    let status = query
        .status
        .as_deref()
        .map(DisputeStatus::from_str)
        .transpose()?;
    let disputes = ctx.disputes.list(status).await?;
    Ok(Json(DisputesResponse { disputes }))
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    resolution: String,
}

/// Close an open dispute with a resolution note
async fn resolve_dispute(
    State(ctx): State<AppContext>,
    auth: AdminContext,
    Path(id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> ConsoleResult<Json<Dispute>> {
    let dispute = ctx
        .disputes
        .resolve(&auth.principal, &id, &req.resolution)
        .await?;
    Ok(Json(dispute))
}
