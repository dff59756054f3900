/// Audit trail endpoint
use crate::{auth::AdminContext, context::AppContext, error::ConsoleResult, model::AdminAction};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build audit trail routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/admin/actions", get(list_actions))
}

#[derive(Debug, Deserialize)]
struct ListActionsQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ActionsResponse {
    actions: Vec<AdminAction>,
}

/// List recent admin actions, newest first (default 50)
async fn list_actions(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
    Query(query): Query<ListActionsQuery>,
) -> ConsoleResult<Json<ActionsResponse>> {
    let actions = ctx.audit.recent(query.limit).await?;
    Ok(Json(ActionsResponse { actions }))
}
