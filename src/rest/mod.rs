// rest/mod.rs — HTTP API server.
//
// Axum router over the shared task store. Local only by default
// (bind_address 127.0.0.1).
//
// Endpoints:
//   GET    /api/v1/todos
//   POST   /api/v1/todos
//   PUT    /api/v1/todos/{id}
//   DELETE /api/v1/todos/{id}
//   GET    /api/v1/health

pub mod routes;

use anyhow::Result;
use axum::routing::{get, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("todo API listening on http://{}", addr);
    serve(listener, ctx).await
}

/// Serve the API on an already-bound listener. Split out so tests can bind
/// port 0 themselves and learn the real address before the server runs.
pub async fn serve(listener: tokio::net::TcpListener, ctx: Arc<AppContext>) -> Result<()> {
    let router = build_router(ctx);
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route(
            "/api/v1/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/api/v1/todos/{id}",
            put(routes::todos::replace_todo).delete(routes::todos::delete_todo),
        )
        // The browser client is served from another origin during development.
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
