/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ConsoleError, ConsoleResult},
    metrics,
};
use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router with middleware
    Router::new()
        // Health check endpoint (probes the store)
        .route("/health", get(health_check))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_endpoint))
        // Admin API routes - merge before with_state
        .merge(crate::api::routes())
        // Provide state - converts Router<AppContext> to Router<()>
        .with_state(ctx)
        .layer(middleware::from_fn(track_requests))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Request counter middleware. Labels use the matched route template,
/// not the raw path, to keep metric cardinality bounded.
async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => "unmatched".to_string(),
    };

    let response = next.run(req).await;
    metrics::record_http_request(method.as_str(), &path, response.status().as_u16());
    response
}

/// Health check handler
async fn health_check(State(ctx): State<AppContext>) -> ConsoleResult<Json<serde_json::Value>> {
    ctx.store.ping().await?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// Prometheus exposition handler
async fn metrics_endpoint() -> String {
    metrics::render_metrics()
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ConsoleResult<()> {
    let addr = format!("{}:{}", ctx.config.hostname, ctx.config.port);

    info!("Kaarigar360 admin console listening on {}", addr);
    info!("   Service URL: {}", ctx.service_url());

    let app = build_router(ctx);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConsoleError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    // Axum 0.7: Router<()> can be passed directly to serve
    axum::serve(listener, app)
        .await
        .map_err(|e| ConsoleError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
