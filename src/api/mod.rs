//! HTTP API module
//!
//! Read-only JSON projections of the show, plus the static display pages.

pub mod handlers;
pub mod responses;

use std::{path::Path, sync::Arc};
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;
use handlers::*;

/// Page served with HTTP 200 for unknown non-API paths
pub const NOT_FOUND_PAGE: &str = "nope.html";

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let pages = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join(NOT_FOUND_PAGE)));

    Router::new()
        .route("/api/read/remote", get(remote_handler))
        .route("/api/read/admin", get(admin_handler))
        .route("/api", get(invalid_request_handler))
        .route("/api/*rest", get(invalid_request_handler))
        .fallback(move |request: Request| api_or_pages(pages.clone(), request))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unrouted requests: anything under the `/api` prefix is rejected, the rest
/// is served from the display pages
async fn api_or_pages(pages: ServeDir<ServeFile>, request: Request) -> Response {
    if request.uri().path().starts_with("/api") {
        return invalid_request_handler().await.into_response();
    }
    pages.oneshot(request).await.into_response()
}
