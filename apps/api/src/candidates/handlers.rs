use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::candidates::analytics::{summarize, AnalyticsSummary};
use crate::candidates::store::{CandidateDetail, CandidateFilter, CandidatePage, DEFAULT_PAGE_LIMIT};
use crate::candidates::with_store;
use crate::errors::AppError;
use crate::models::candidate::CandidateStatus;
use crate::state::AppState;

const MAX_PAGE_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    fn into_filter(self) -> Result<CandidateFilter, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(CandidateFilter {
            job_id: self.job_id.filter(|j| !j.is_empty()),
            status: self.status.filter(|s| !s.is_empty()),
            limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct JobQuery {
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesUpdate {
    pub notes: String,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CandidatePage>, AppError> {
    let filter = query.into_filter()?;
    let page = with_store(&state.store, move |store| store.list(&filter)).await?;
    Ok(Json(page))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> Result<Json<CandidateDetail>, AppError> {
    let candidate = with_store(&state.store, move |store| store.get(id)).await?;
    Ok(Json(candidate.into()))
}

/// PATCH /api/v1/candidates/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<CandidateDetail>, AppError> {
    let status = req
        .status
        .parse::<CandidateStatus>()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let candidate = with_store(&state.store, move |store| store.update_status(id, status)).await?;
    tracing::info!(id, status = %status, "candidate status updated");
    Ok(Json(candidate.into()))
}

/// PATCH /api/v1/candidates/:id/notes
pub async fn handle_update_notes(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    Json(req): Json<NotesUpdate>,
) -> Result<Json<CandidateDetail>, AppError> {
    let candidate =
        with_store(&state.store, move |store| store.update_notes(id, &req.notes)).await?;
    tracing::info!(id, "candidate notes updated");
    Ok(Json(candidate.into()))
}

/// GET /api/v1/analytics/summary
pub async fn handle_analytics_summary(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let rows = with_store(&state.store, |store| store.rows()).await?;
    let job_id = query.job_id.filter(|j| !j.is_empty());
    Ok(Json(summarize(&rows, job_id.as_deref())))
}
