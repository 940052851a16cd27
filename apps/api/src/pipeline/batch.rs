use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{Pipeline, ScreeningResult};

/// File extensions a batch run picks up.
const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// Result of screening every resume in the resumes directory.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    pub run_id: Uuid,
    pub job_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<ScreeningResult>,
}

/// Resume files directly inside `dir`, sorted by file name.
/// A directory that does not exist holds no resumes.
pub async fn find_resume_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "resumes directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_resume(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_resume(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RESUME_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

impl Pipeline {
    /// Screens every resume in `resumes_dir` sequentially, in file-name order.
    pub async fn run_batch(
        &self,
        job_id: &str,
        job_description: &str,
        resumes_dir: &Path,
    ) -> io::Result<BatchRun> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let files = find_resume_files(resumes_dir).await?;
        info!(%run_id, job_id, files = files.len(), "screening run started");

        let mut results = Vec::with_capacity(files.len());
        for path in &files {
            results.push(self.process(job_id, job_description, path).await);
        }

        let failed = results.iter().filter(|r| r.error.is_some()).count();
        info!(%run_id, job_id, screened = results.len(), failed, "screening run finished");

        Ok(BatchRun {
            run_id,
            job_id: job_id.to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::store::{CandidateFilter, CandidateStore};
    use crate::models::candidate::CandidateStatus;
    use crate::scoring::{RuleBasedScorer, SkillVocabulary};
    use std::fs;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_resume_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.PDF", "c.docx", "notes.md", "noext"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let names: Vec<_> = find_resume_files(dir.path())
            .await
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.PDF", "b.txt", "c.docx"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_resume_files(&dir.path().join("nope")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_survives_a_corrupt_resume() {
        let dir = tempfile::tempdir().unwrap();
        let resumes = dir.path().join("resumes");
        fs::create_dir(&resumes).unwrap();
        fs::write(resumes.join("ann.txt"), "Ann\nPython and SQL").unwrap();
        fs::write(resumes.join("bo.docx"), "not a zip archive").unwrap();
        fs::write(resumes.join("cy.txt"), "Cy\nSQL").unwrap();

        let store = Arc::new(CandidateStore::new(dir.path().join("candidates.csv")));
        let scorer = Arc::new(RuleBasedScorer::new(SkillVocabulary::new(["python", "sql"], 5, 2)));
        let pipeline = Pipeline::new(scorer, Arc::clone(&store), "Backend Engineer");

        let run = pipeline.run_batch("JOB-7", "jd", &resumes).await.unwrap();

        assert_eq!(run.job_id, "JOB-7");
        assert!(run.finished_at >= run.started_at);
        let files: Vec<_> = run.results.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, ["ann.txt", "bo.docx", "cy.txt"]);
        assert!(run.results.iter().all(|r| r.status == CandidateStatus::Applied));

        let scores: Vec<_> = run.results.iter().map(|r| r.score.total_score).collect();
        assert_eq!(scores, [9, 5, 7]);

        let page = store.list(&CandidateFilter::default()).unwrap();
        assert_eq!(page.total, 3);
    }
}
