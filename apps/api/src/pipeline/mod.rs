//! Per-resume screening pipeline.
//!
//! Stage order is fixed: extract → score → validate → generate questions → persist.
//! The whole sequence sits behind one failure boundary per resume: whatever
//! goes wrong, `process` returns a well-formed `ScreeningResult` and, where the
//! store allows, leaves an `error` row behind.

pub mod batch;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::candidates::store::{CandidateStore, StoreError};
use crate::extraction::ResumeDocument;
use crate::interview::generate_questions;
use crate::models::candidate::{CandidateRecord, CandidateStatus, Contact};
use crate::scoring::{ScoreCard, ScoreResult, Scorer};

pub use batch::BatchRun;

#[derive(Debug, Error)]
enum StageError {
    #[error("text extraction task failed: {0}")]
    Extraction(#[source] JoinError),

    #[error("store task failed: {0}")]
    StoreTask(#[source] JoinError),

    #[error("failed to store candidate: {0}")]
    Store(#[from] StoreError),
}

/// Outcome envelope for one resume. `error` is only present on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub job_id: String,
    pub file: String,
    pub contact: Contact,
    pub score: ScoreResult,
    pub questions: Vec<String>,
    pub status: CandidateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub saved_filename: String,
}

impl ScreeningResult {
    fn from_record(record: CandidateRecord, file: &str) -> Self {
        Self {
            job_id: record.job_id,
            file: file.to_string(),
            contact: record.contact,
            score: record.score,
            questions: record.questions,
            status: record.status,
            error: None,
            saved_filename: record.saved_filename,
        }
    }

    fn failed(job_id: &str, file: &str, error: String) -> Self {
        Self {
            job_id: job_id.to_string(),
            file: file.to_string(),
            contact: Contact::default(),
            score: ScoreResult::default(),
            questions: Vec::new(),
            status: CandidateStatus::Error,
            error: Some(error),
            saved_filename: file.to_string(),
        }
    }
}

/// Sequences the screening stages for one resume at a time.
pub struct Pipeline {
    scorer: Arc<dyn Scorer>,
    store: Arc<CandidateStore>,
    job_title: String,
}

impl Pipeline {
    pub fn new(scorer: Arc<dyn Scorer>, store: Arc<CandidateStore>, job_title: impl Into<String>) -> Self {
        Self {
            scorer,
            store,
            job_title: job_title.into(),
        }
    }

    pub fn scorer_backend(&self) -> &'static str {
        self.scorer.backend()
    }

    /// Screens one resume. Never fails; a failed stage yields an `error` envelope.
    pub async fn process(
        &self,
        job_id: &str,
        job_description: &str,
        resume_path: &Path,
    ) -> ScreeningResult {
        let file = resume_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.run_stages(job_id, job_description, resume_path, &file).await {
            Ok(result) => {
                info!(
                    job_id,
                    file = %file,
                    total_score = result.score.total_score,
                    questions = result.questions.len(),
                    backend = self.scorer.backend(),
                    "resume screened"
                );
                result
            }
            Err(err) => {
                error!(job_id, file = %file, error = %err, "resume screening failed");
                self.record_failure(job_id, &file, &err).await;
                ScreeningResult::failed(job_id, &file, err.to_string())
            }
        }
    }

    async fn run_stages(
        &self,
        job_id: &str,
        job_description: &str,
        resume_path: &Path,
        file: &str,
    ) -> Result<ScreeningResult, StageError> {
        let path = resume_path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || ResumeDocument::load(&path))
            .await
            .map_err(StageError::Extraction)?;
        if document.text.is_empty() {
            warn!(path = %document.path.display(), "resume yielded no text; scoring it as empty");
        }

        let card = self.scorer.score(&document.text, job_description).await;
        let score = validate_score(card, file);

        let questions =
            generate_questions(&score.missing_skills, &score.found_skills, &self.job_title);
        debug!(file, questions = questions.len(), "interview questions generated");

        let record = CandidateRecord::new(job_id, document.contact, score, questions, file);
        self.append(record.clone()).await?;

        Ok(ScreeningResult::from_record(record, file))
    }

    async fn append(&self, record: CandidateRecord) -> Result<(), StageError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(StageError::StoreTask)??;
        Ok(())
    }

    async fn record_failure(&self, job_id: &str, file: &str, err: &StageError) {
        let record = CandidateRecord::failed(job_id, file, &err.to_string());
        if let Err(append_err) = self.append(record).await {
            error!(job_id, file, error = %append_err, "failed to record screening failure");
        }
    }
}

/// Repairs a partial score, logging each key the backend left out.
fn validate_score(card: ScoreCard, file: &str) -> ScoreResult {
    let missing = card.missing_keys();
    if !missing.is_empty() {
        warn!(file, missing = ?missing, "score is missing keys; filling defaults");
    }
    card.into_result()
}
