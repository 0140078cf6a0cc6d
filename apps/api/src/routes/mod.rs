pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Keyword API
        .route(
            "/api/v1/keywords/extract",
            post(handlers::handle_extract_keywords),
        )
        .route(
            "/api/v1/keywords/parse",
            post(handlers::handle_parse_keywords),
        )
        // Scoring API
        .route("/api/v1/score", post(handlers::handle_score))
        .route("/api/v1/checklist", post(handlers::handle_checklist))
        // Debounced sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/inputs",
            put(handlers::handle_update_session),
        )
        .route(
            "/api/v1/sessions/:id/recalculate",
            post(handlers::handle_recalculate_session),
        )
        .with_state(state)
}
