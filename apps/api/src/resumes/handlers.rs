use anyhow::Context;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::load_job_description;
use crate::pipeline::{BatchRun, ScreeningResult};
use crate::resumes::{sanitize_filename, save_resume};
use crate::state::AppState;

/// Multipart field carrying the resume.
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct JobQuery {
    pub job_id: Option<String>,
}

impl JobQuery {
    fn job_id_or(self, default: &str) -> String {
        self.job_id
            .filter(|j| !j.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: String,
    pub result: ScreeningResult,
}

/// POST /api/v1/resumes
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let job_id = query.job_id_or(&state.config.default_job_id);

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(format!("invalid multipart body: {err}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .and_then(sanitize_filename)
            .ok_or_else(|| AppError::Validation("uploaded file has no usable name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::Validation(format!("failed to read upload: {err}")))?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload
        .ok_or_else(|| AppError::Validation(format!("missing multipart field '{FILE_FIELD}'")))?;

    let path = save_resume(&state.config.resumes_dir, &filename, &bytes)
        .await
        .context("failed to save uploaded resume")?;

    let job_description = load_job_description(&state.config.job_description_path).await?;
    let result = state.pipeline.process(&job_id, &job_description, &path).await;

    Ok(Json(UploadResponse {
        message: "Resume processed".to_string(),
        file: filename,
        result,
    }))
}

/// GET /api/v1/resumes/file/:filename
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound(format!("Resume {filename} not found"));

    let safe = sanitize_filename(&filename)
        .filter(|safe| *safe == filename)
        .ok_or_else(not_found)?;
    let path = state.config.resumes_dir.join(&safe);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("failed to read resume {}", path.display()))
                .into())
        }
    };

    let headers = [
        (header::CONTENT_TYPE, content_type(&safe).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", safe.replace('"', "")),
        ),
    ];
    Ok((headers, bytes))
}

/// POST /api/v1/screening/run
pub async fn handle_run_screening(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<BatchRun>, AppError> {
    let job_id = query.job_id_or(&state.config.default_job_id);
    let job_description = load_job_description(&state.config.job_description_path).await?;

    let run = state
        .pipeline
        .run_batch(&job_id, &job_description, &state.config.resumes_dir)
        .await
        .context("failed to scan resumes directory")?;
    Ok(Json(run))
}

fn content_type(filename: &str) -> &'static str {
    let extension = filename.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
