//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{debug, error};

use super::responses::ApiResponse;
use crate::state::{AppState, ShowView};

/// Handle GET /api/read/remote - running timer only, for public displays
pub async fn remote_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ShowView>>, StatusCode> {
    match state.render_active_only() {
        Ok(view) => Ok(Json(ApiResponse::ok(view))),
        Err(e) => {
            error!("Failed to render remote view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /api/read/admin - every timer and switch
pub async fn admin_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ShowView>>, StatusCode> {
    match state.render_full() {
        Ok(view) => Ok(Json(ApiResponse::ok(view))),
        Err(e) => {
            error!("Failed to render admin view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Any other /api path
pub async fn invalid_request_handler() -> (StatusCode, Json<ApiResponse<()>>) {
    debug!("Rejecting unknown API request");
    (StatusCode::FORBIDDEN, Json(ApiResponse::error("invalid-request")))
}
