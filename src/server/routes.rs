//! HTTP API Route Definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the router. The form UI is mounted at `/` when `ui_enabled`.
pub fn create_router(app_state: AppState, ui_enabled: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/process_urls", post(handlers::process_urls))
        .route("/ask_question", post(handlers::ask_question))
        .route("/pages", get(handlers::pages));

    if ui_enabled {
        router = router
            .route("/", get(handlers::ui_index))
            .route("/ui/process_urls", post(handlers::ui_process_urls))
            .route("/ui/ask_question", post(handlers::ui_ask_question));
    }

    router.with_state(app_state)
}
