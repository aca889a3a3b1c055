pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analysis::handlers as analysis;
use crate::state::AppState;
use crate::upload::handlers as upload;
use crate::upload::validation::MAX_UPLOAD_BYTES;

/// Room for multipart boundaries and part headers on top of the file itself,
/// so an oversized file still reaches validation and gets its own message.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analyze Function
        .route("/api/v1/analyze-resume", post(analysis::handle_analyze))
        // Upload flow
        .route(
            "/api/v1/resumes",
            post(upload::handle_upload).layer(DefaultBodyLimit::max(
                MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route("/api/v1/resumes/:id", get(upload::handle_get_resume))
        // History views
        .route("/api/v1/analyses", get(analysis::handle_list_analyses))
        .route(
            "/api/v1/analyses/report",
            get(analysis::handle_history_report),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
