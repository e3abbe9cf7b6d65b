use std::path::Path;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, index, option1_page, option2_page, upload_masking, upload_split};
use crate::state::AppState;

pub fn app_router(state: AppState, static_dir: &Path, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/option1", get(option1_page).post(option1_page))
        .route("/option2", get(option2_page).post(option2_page))
        .route("/upload1", post(upload_masking))
        .route("/upload2", post(upload_split))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
