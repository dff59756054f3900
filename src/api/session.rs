/// Admin session endpoints (sign in, introspect, sign out)
use crate::{
    auth::{AdminContext, AdminPrincipal, SignedSession},
    context::AppContext,
    error::ConsoleResult,
};
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;

/// Build session routes
pub fn routes() -> Router<AppContext> {
    Router::new().route(
        "/admin/session",
        post(sign_in).get(current_session).delete(sign_out),
    )
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

/// Exchange the operator credential for a bearer token
async fn sign_in(
    State(ctx): State<AppContext>,
    Json(req): Json<SignInRequest>,
) -> ConsoleResult<Json<SignedSession>> {
    let session = ctx.auth.sign_in(&req.email, &req.password)?;
    Ok(Json(session))
}

/// Return the principal behind the presented token
async fn current_session(auth: AdminContext) -> Json<AdminPrincipal> {
    Json(auth.principal)
}

/// Sign out. Tokens are not tracked server-side, so this only confirms
/// the token was still valid; the client discards it.
async fn sign_out(auth: AdminContext) -> Json<serde_json::Value> {
    tracing::info!(admin = %auth.principal.admin_id, "Admin signed out");
    Json(json!({ "ok": true }))
}
