/// API routes and handlers
pub mod accounts;
pub mod actions;
pub mod analytics;
pub mod bookings;
pub mod disputes;
pub mod session;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(session::routes())
        .merge(accounts::routes())
        .merge(bookings::routes())
        .merge(disputes::routes())
        .merge(analytics::routes())
        .merge(actions::routes())
}
