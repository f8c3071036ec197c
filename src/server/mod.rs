//! HTTP surface of the category service.
//!
//! Every route lives under [`API_PREFIX`]:
//!
//! - `GET    /api/category`        list summaries
//! - `POST   /api/category`        create, 201 with `Location`
//! - `GET    /api/category/{id}`   full record
//! - `PATCH  /api/category/{id}`   replace, 201 with `Location`
//! - `DELETE /api/category/{id}`   delete, idempotent
//!
//! `PATCH` and `DELETE` on `/api/category/` address the empty id. Request
//! bodies have no size limit. `OPTIONS` is answered for any path. Unknown
//! paths get a JSON 404 and unsupported methods on known paths a JSON 405.

use crate::category_manager::CategoryManager;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod headers;

pub const API_PREFIX: &str = "/api";

pub type SharedManager = Arc<CategoryManager>;

pub fn app(manager: SharedManager) -> Router {
    let api = Router::new()
        .route(
            "/category",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/category/",
            get(handlers::list_categories)
                .post(handlers::create_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/category/{*id}",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(DefaultBodyLimit::disable())
        .with_state(manager);

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(headers::api_headers))
        .layer(TraceLayer::new_for_http())
}

/// Serves `app` on `listener` until ctrl-c.
pub async fn run(listener: TcpListener, manager: SharedManager) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    log_banner(addr);

    axum::serve(listener, app(manager))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn log_banner(addr: SocketAddr) {
    tracing::info!("Brain Cards server listening on http://{addr}");
    tracing::info!("Press CTRL+C to stop the server");
    tracing::info!("GET    {API_PREFIX}/category       list categories");
    tracing::info!("GET    {API_PREFIX}/category/{{id}}  list pairs of a category");
    tracing::info!("POST   {API_PREFIX}/category       add a category {{title, pairs: [[string, string]]}}");
    tracing::info!("PATCH  {API_PREFIX}/category/{{id}}  update a category {{id, title, pairs}}");
    tracing::info!("DELETE {API_PREFIX}/category/{{id}}  delete a category");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
