/// Booking listing endpoint
use crate::{
    auth::AdminContext,
    context::AppContext,
    error::ConsoleResult,
    model::Booking,
    store::{self, Direction},
};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Build booking routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/admin/bookings", get(list_bookings))
}

#[derive(Debug, Serialize)]
struct BookingsResponse {
    bookings: Vec<Booking>,
}

/// List all bookings, newest first
async fn list_bookings(
    State(ctx): State<AppContext>,
    _auth: AdminContext,
) -> ConsoleResult<Json<BookingsResponse>> {
    let docs = store::fetch_ordered_with_fallback(
        ctx.store.as_ref(),
        store::BOOKINGS,
        "createdAt",
        Direction::Descending,
        None,
    )
    .await?;
    let bookings = store::decode_documents(&docs, store::BOOKINGS);
    Ok(Json(BookingsResponse { bookings }))
}
