pub mod health;

use axum::{
    response::Html,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers;
use crate::feedback::handlers as feedback;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Analysis page sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/inputs",
            put(handlers::handle_update_inputs),
        )
        .route("/api/v1/sessions/:id/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/sessions/:id/suggestions/:index/copy",
            post(handlers::handle_copy_suggestion),
        )
        .route("/api/v1/sessions/:id/report", get(handlers::handle_report))
        // Feedback (insert-only for anonymous callers)
        .route(
            "/api/v1/feedback",
            post(feedback::handle_submit_feedback).get(feedback::handle_list_feedback),
        )
        .with_state(state)
}
