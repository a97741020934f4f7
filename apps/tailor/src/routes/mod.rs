pub mod health;
pub mod tailor;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tailor", post(tailor::handle_tailor))
        .route("/api/v1/tailor/upload", post(tailor::handle_upload))
        .with_state(state)
}
