pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/feedback", get(handlers::handle_list_feedback))
        .route(
            "/api/v1/feedback/:feedback_id/tags",
            post(handlers::handle_add_tag).delete(handlers::handle_remove_tag),
        )
        .route("/api/v1/tags", get(handlers::handle_list_tags))
        .route("/api/v1/watchlist", get(handlers::handle_list_watchlist))
        .with_state(state)
}
