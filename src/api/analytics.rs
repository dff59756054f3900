/// Dashboard and windowed analytics endpoints
///
/// Handlers gather whole collections and hand them to the pure
/// aggregation functions in `crate::analytics`. Malformed documents are
/// skipped at decode time so one bad row cannot blank the dashboard.
use crate::{
    analytics::{self, TimeWindow, WindowReport},
    auth::AdminContext,
    context::AppContext,
    error::ConsoleResult,
    model::{Account, Booking, DashboardStats, Dispute},
    store::{self, decode_collection},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

/// Build analytics routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/admin/stats", get(dashboard))
        .route("/admin/analytics", get(report))
}

/// Headline dashboard counters
async fn dashboard(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
) -> ConsoleResult<Json<DashboardStats>> {
    let accounts: Vec<Account> = decode_collection(ctx.store.as_ref(), store::USERS).await?;
    let bookings: Vec<Booking> = decode_collection(ctx.store.as_ref(), store::BOOKINGS).await?;
    let disputes: Vec<Dispute> = decode_collection(ctx.store.as_ref(), store::DISPUTES).await?;

    let stats = analytics::dashboard_stats(&accounts, &bookings, &disputes, Utc::now());
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    #[serde(default)]
    window: Option<String>,
}

/// Windowed activity report (7d, 30d, 90d, 1y)
async fn report(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
    Query(query): Query<ReportQuery>,
) -> ConsoleResult<Json<WindowReport>> {
    let window = match query.window.as_deref() {
        Some(w) => TimeWindow::from_str(w)?,
        None => TimeWindow::default(),
    };

    let accounts: Vec<Account> = decode_collection(ctx.store.as_ref(), store::USERS).await?;
    let bookings: Vec<Booking> = decode_collection(ctx.store.as_ref(), store::BOOKINGS).await?;

    let report = analytics::window_report(&accounts, &bookings, Utc::now(), window);
    Ok(Json(report))
}
