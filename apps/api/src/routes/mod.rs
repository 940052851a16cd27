pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Upper bound on an uploaded resume.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes and screening runs
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/resumes/file/:filename",
            get(resumes::handle_download_resume),
        )
        .route("/api/v1/screening/run", post(resumes::handle_run_screening))
        // Candidates
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(candidates::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/status",
            patch(candidates::handle_update_status),
        )
        .route(
            "/api/v1/candidates/:id/notes",
            patch(candidates::handle_update_notes),
        )
        .route(
            "/api/v1/analytics/summary",
            get(candidates::handle_analytics_summary),
        )
        // Job descriptions
        .route("/api/v1/jobs/optimize", post(jobs::handle_optimize))
        .with_state(state)
}
