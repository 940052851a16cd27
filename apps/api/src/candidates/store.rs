//! Candidate record store: one CSV row per processed resume.
//!
//! Rows are addressed by their 1-based position in the file. Appends add a
//! row at the end (writing the header first on a fresh file); status and notes
//! updates rewrite the whole file through a temp file that is renamed into
//! place, so readers only ever see the old or the new file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::models::candidate::{CandidateRecord, CandidateStatus};

/// Column order of the store file. The first twelve are the stable row
/// contract; `missing_skills` is a trailing extension older files may lack.
pub const STORE_COLUMNS: [&str; 13] = [
    "job_id",
    "name",
    "email",
    "phone",
    "total_score",
    "base_score",
    "skill_score",
    "penalty",
    "questions",
    "status",
    "notes",
    "saved_filename",
    "missing_skills",
];

/// Separator for list-valued columns.
pub const LIST_SEPARATOR: &str = " | ";

pub const DEFAULT_PAGE_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("candidate {id} not found")]
    NotFound { id: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// One stored row. Field order matches `STORE_COLUMNS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRow {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub total_score: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub base_score: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub skill_score: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub penalty: i64,
    #[serde(default)]
    pub questions: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub saved_filename: String,
    #[serde(default)]
    pub missing_skills: String,
}

impl From<&CandidateRecord> for CandidateRow {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            job_id: record.job_id.clone(),
            name: record.contact.name.clone(),
            email: record.contact.email.clone(),
            phone: record.contact.phone.clone(),
            total_score: record.score.total_score,
            base_score: record.score.base_score,
            skill_score: record.score.skill_score,
            penalty: record.score.penalty,
            questions: record.questions.join(LIST_SEPARATOR),
            status: record.status.as_str().to_string(),
            notes: record.notes.clone(),
            saved_filename: record.saved_filename.clone(),
            missing_skills: record.score.missing_skills.join(LIST_SEPARATOR),
        }
    }
}

impl CandidateRow {
    pub fn question_list(&self) -> Vec<String> {
        split_list(&self.questions)
    }

    pub fn missing_skill_list(&self) -> Vec<String> {
        split_list(&self.missing_skills)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Integer column reader: integers, then floats (truncated), else 0.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    Ok(raw
        .parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|f| f as i64))
        .unwrap_or(0))
}

/// A row together with its positional identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredCandidate {
    pub id: usize,
    #[serde(flatten)]
    pub row: CandidateRow,
}

/// Single-candidate view: list-valued columns are split back into lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateDetail {
    pub id: usize,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub total_score: i64,
    pub base_score: i64,
    pub skill_score: i64,
    pub penalty: i64,
    pub questions: Vec<String>,
    pub missing_skills: Vec<String>,
    pub status: String,
    pub notes: String,
    pub saved_filename: String,
}

impl From<StoredCandidate> for CandidateDetail {
    fn from(candidate: StoredCandidate) -> Self {
        let questions = candidate.row.question_list();
        let missing_skills = candidate.row.missing_skill_list();
        let row = candidate.row;
        Self {
            id: candidate.id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            total_score: row.total_score,
            base_score: row.base_score,
            skill_score: row.skill_score,
            penalty: row.penalty,
            questions,
            missing_skills,
            status: row.status,
            notes: row.notes,
            saved_filename: row.saved_filename,
        }
    }
}

/// Listing filters. `job_id` matches exactly, `status` case-insensitively.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            job_id: None,
            status: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl CandidateFilter {
    fn matches(&self, row: &CandidateRow) -> bool {
        let job_matches = self.job_id.as_deref().map_or(true, |job_id| row.job_id == job_id);
        let status_matches = self
            .status
            .as_deref()
            .map_or(true, |status| row.status.eq_ignore_ascii_case(status));
        job_matches && status_matches
    }
}

/// One page of a filtered listing. `total` counts all matches before paging.
#[derive(Debug, Clone, Serialize)]
pub struct CandidatePage {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub candidates: Vec<StoredCandidate>,
}

/// Single-writer CSV store. Writes within this process are serialized.
pub struct CandidateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the file is new or empty.
    /// A file written with an older column set is rewritten to the current
    /// header before the row is added.
    pub fn append(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)?;
        }
        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {
                if !self.has_current_header()? {
                    let rows = self.rows()?;
                    self.rewrite(&rows)?;
                    debug!(path = %self.path.display(), rows = rows.len(), "store header upgraded");
                }
                false
            }
            _ => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(STORE_COLUMNS)?;
        }
        writer.serialize(CandidateRow::from(record))?;
        writer.flush()?;

        debug!(path = %self.path.display(), job_id = %record.job_id, "candidate row appended");
        Ok(())
    }

    fn has_current_header(&self) -> Result<bool, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        Ok(reader.headers()?.iter().eq(STORE_COLUMNS))
    }

    /// Every row in file order. A store that does not exist yet is empty.
    pub fn rows(&self) -> Result<Vec<CandidateRow>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for row in reader.deserialize::<CandidateRow>() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Filtered, paginated listing. Each row keeps its position in the full
    /// store as its id, so ids from a listing are valid for `get` and updates.
    pub fn list(&self, filter: &CandidateFilter) -> Result<CandidatePage, StoreError> {
        let matching: Vec<StoredCandidate> = self
            .rows()?
            .into_iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(row))
            .map(|(index, row)| StoredCandidate { id: index + 1, row })
            .collect();

        let total = matching.len();
        let candidates = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(CandidatePage {
            total,
            limit: filter.limit,
            offset: filter.offset,
            candidates,
        })
    }

    /// The row at 1-based position `id`.
    pub fn get(&self, id: usize) -> Result<StoredCandidate, StoreError> {
        let rows = self.rows()?;
        let row = position(id, rows.len())
            .map(|index| rows[index].clone())
            .ok_or(StoreError::NotFound { id })?;
        Ok(StoredCandidate { id, row })
    }

    pub fn update_status(
        &self,
        id: usize,
        status: CandidateStatus,
    ) -> Result<StoredCandidate, StoreError> {
        self.update(id, |row| row.status = status.as_str().to_string())
    }

    pub fn update_notes(&self, id: usize, notes: &str) -> Result<StoredCandidate, StoreError> {
        self.update(id, |row| row.notes = notes.to_string())
    }

    /// Read-modify-write of the whole store. Skips the rewrite when the
    /// mutation leaves the row unchanged.
    fn update<F>(&self, id: usize, mutate: F) -> Result<StoredCandidate, StoreError>
    where
        F: FnOnce(&mut CandidateRow),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut rows = self.rows()?;
        let index = position(id, rows.len()).ok_or(StoreError::NotFound { id })?;

        let before = rows[index].clone();
        mutate(&mut rows[index]);
        if rows[index] != before {
            self.rewrite(&rows)?;
        }

        Ok(StoredCandidate {
            id,
            row: rows[index].clone(),
        })
    }

    fn rewrite(&self, rows: &[CandidateRow]) -> Result<(), StoreError> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(temp.as_file_mut());
            writer.write_record(STORE_COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        debug!(path = %self.path.display(), rows = rows.len(), "candidate store rewritten");
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

/// Zero-based index for a 1-based id, if in range.
fn position(id: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&id).then(|| id - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Contact;
    use crate::scoring::ScoreResult;

    fn record(job_id: &str, name: &str, total: i64) -> CandidateRecord {
        CandidateRecord::new(
            job_id,
            Contact {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: String::new(),
            },
            ScoreResult {
                base_score: 5,
                skill_score: total - 5,
                penalty: 0,
                total_score: total,
                missing_skills: vec!["docker".to_string(), "aws".to_string()],
                found_skills: vec!["python".to_string()],
            },
            vec!["Q1?".to_string(), "Q2?".to_string()],
            &format!("{name}.txt"),
        )
    }

    fn store_in(dir: &tempfile::TempDir) -> CandidateStore {
        CandidateStore::new(dir.path().join("data").join("candidates.csv"))
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.rows().unwrap().is_empty());
        assert_eq!(store.list(&CandidateFilter::default()).unwrap().total, 0);
    }

    #[test]
    fn test_append_writes_header_once_then_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for (i, name) in ["Ann", "Bo", "Cy"].iter().enumerate() {
            store.append(&record("JOB-1", name, 7 + i as i64)).unwrap();
        }

        let contents = fs::read_to_string(store.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), STORE_COLUMNS.join(","));
        assert_eq!(contents.matches("job_id,name").count(), 1);

        let page = store.list(&CandidateFilter::default()).unwrap();
        let names: Vec<_> = page.candidates.iter().map(|c| c.row.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bo", "Cy"]);
        assert_eq!(page.candidates[1].row.questions, "Q1? | Q2?");
        assert_eq!(page.candidates[1].row.status, "applied");
        assert_eq!(page.candidates[1].row.missing_skills, "docker | aws");

        for candidate in &page.candidates {
            assert_eq!(&store.get(candidate.id).unwrap(), candidate);
        }
    }

    #[test]
    fn test_detail_splits_list_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();

        let detail = CandidateDetail::from(store.get(1).unwrap());
        assert_eq!(detail.id, 1);
        assert_eq!(detail.name, "Ann");
        assert_eq!(detail.questions, vec!["Q1?", "Q2?"]);
        assert_eq!(detail.missing_skills, vec!["docker", "aws"]);
        assert_eq!(detail.status, "applied");
    }

    #[test]
    fn test_get_out_of_range_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();
        store.append(&record("JOB-1", "Bo", 9)).unwrap();

        assert!(matches!(store.get(0), Err(StoreError::NotFound { id: 0 })));
        assert!(matches!(store.get(3), Err(StoreError::NotFound { id: 3 })));
        assert!(matches!(
            store.update_status(3, CandidateStatus::Review),
            Err(StoreError::NotFound { id: 3 })
        ));
        assert!(matches!(store.update_notes(0, "x"), Err(StoreError::NotFound { id: 0 })));
    }

    #[test]
    fn test_update_status_is_visible_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();
        store.append(&record("JOB-1", "Bo", 9)).unwrap();

        store.update_status(2, CandidateStatus::Shortlisted).unwrap();
        assert_eq!(store.get(2).unwrap().row.status, "shortlisted");
        let after_first = fs::read(store.path()).unwrap();

        store.update_status(2, CandidateStatus::Shortlisted).unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), after_first);
        assert_eq!(store.get(1).unwrap().row.status, "applied");
    }

    #[test]
    fn test_notes_with_csv_metacharacters_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();

        let notes = "Strong, but \"quiet\"\nfollow up Monday";
        store.update_notes(1, notes).unwrap();

        let row = store.get(1).unwrap().row;
        assert_eq!(row.notes, notes);
        assert_eq!(row.total_score, 7);
        assert_eq!(row.question_list(), vec!["Q1?", "Q2?"]);
    }

    #[test]
    fn test_list_filters_and_keeps_store_positions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();
        store.append(&record("JOB-2", "Bo", 9)).unwrap();
        store.append(&record("JOB-1", "Cy", 11)).unwrap();
        store.append(&record("JOB-1", "Di", 5)).unwrap();
        store.update_status(3, CandidateStatus::Shortlisted).unwrap();

        let page = store
            .list(&CandidateFilter {
                job_id: Some("JOB-1".to_string()),
                ..CandidateFilter::default()
            })
            .unwrap();
        let ids: Vec<_> = page.candidates.iter().map(|c| c.id).collect();
        assert_eq!(page.total, 3);
        assert_eq!(ids, [1, 3, 4]);

        let shortlisted = store
            .list(&CandidateFilter {
                status: Some("SHORTLISTED".to_string()),
                ..CandidateFilter::default()
            })
            .unwrap();
        assert_eq!(shortlisted.total, 1);
        assert_eq!(shortlisted.candidates[0].id, 3);
        assert_eq!(shortlisted.candidates[0].row.name, "Cy");

        let paged = store
            .list(&CandidateFilter {
                job_id: Some("JOB-1".to_string()),
                limit: 1,
                offset: 1,
                ..CandidateFilter::default()
            })
            .unwrap();
        assert_eq!(paged.total, 3);
        assert_eq!(paged.candidates.len(), 1);
        assert_eq!(paged.candidates[0].id, 3);
    }

    #[test]
    fn test_append_to_legacy_file_keeps_missing_skills() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(
            &path,
            "job_id,name,email,phone,total_score,base_score,skill_score,penalty,questions,status,notes,saved_filename\n\
             JOB-1,Old Timer,old@example.com,,5,5,0,0,Q?,applied,,old.txt\n",
        )
        .unwrap();

        let store = CandidateStore::new(&path);
        store.append(&record("JOB-1", "Ann", 7)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(&STORE_COLUMNS.join(",")));
        assert_eq!(store.get(1).unwrap().row.name, "Old Timer");
        let appended = store.get(2).unwrap().row;
        assert_eq!(appended.name, "Ann");
        assert_eq!(appended.missing_skills, "docker | aws");

        let summary = crate::candidates::analytics::summarize(&store.rows().unwrap(), Some("JOB-1"));
        assert_eq!(summary.total, 2);
        let skills: Vec<_> = summary
            .top_missing_skills
            .iter()
            .map(|s| (s.skill.as_str(), s.count))
            .collect();
        assert_eq!(skills, [("docker", 1), ("aws", 1)]);
    }

    #[test]
    fn test_reads_legacy_twelve_column_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(
            &path,
            "job_id,name,email,phone,total_score,base_score,skill_score,penalty,questions,status,notes,saved_filename\n\
             JOB-001,John Doe,john@example.com,+91-99999-99999,9.0,5,4,0,Q1 | Q2,,,cv.pdf\n",
        )
        .unwrap();

        let store = CandidateStore::new(&path);
        let row = store.get(1).unwrap().row;
        assert_eq!(row.name, "John Doe");
        assert_eq!(row.total_score, 9);
        assert_eq!(row.status, "");
        assert_eq!(row.missing_skills, "");
        assert_eq!(row.saved_filename, "cv.pdf");

        store.update_status(1, CandidateStatus::Review).unwrap();
        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(&STORE_COLUMNS.join(",")));
        assert_eq!(store.get(1).unwrap().row.status, "review");
    }
}
