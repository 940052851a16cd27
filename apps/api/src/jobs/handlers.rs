use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::optimize_job_description;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub original: String,
    pub optimized: String,
}

/// POST /api/v1/jobs/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if req.description.trim().is_empty() {
        return Err(AppError::Validation("description must not be empty".to_string()));
    }
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Validation("job description optimization requires ANTHROPIC_API_KEY".to_string())
    })?;

    let optimized = optimize_job_description(llm.as_ref(), &req.description).await?;
    Ok(Json(OptimizeResponse {
        original: req.description,
        optimized,
    }))
}
