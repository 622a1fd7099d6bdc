pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::ats::handlers as ats;
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume builder
        .route(
            "/api/v1/resumes/generate",
            post(generation::handle_generate_resume),
        )
        .route("/api/v1/resumes/pdf", post(generation::handle_resume_pdf))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_end_session),
        )
        // ATS analyzer
        .route(
            "/api/v1/sessions/:id/ats/evaluate",
            post(ats::handle_evaluate),
        )
        .route("/api/v1/sessions/:id/ats/score", post(ats::handle_score))
        .route("/api/v1/sessions/:id/ats/result", get(ats::handle_get_result))
        // Visual analytics
        .route(
            "/api/v1/sessions/:id/analytics",
            get(analytics::handle_analytics),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
