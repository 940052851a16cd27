use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::ScoreResult;

/// Best-guess contact details pulled from resume text. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Review state of a candidate. Stored lower-case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    #[default]
    Applied,
    Review,
    Shortlisted,
    Rejected,
    Error,
}

impl CandidateStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Applied,
            Self::Review,
            Self::Shortlisted,
            Self::Rejected,
            Self::Error,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Review => "review",
            Self::Shortlisted => "shortlisted",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown candidate status '{0}' (expected one of applied, review, shortlisted, rejected, error)")]
pub struct UnknownStatus(pub String);

impl FromStr for CandidateStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// The durable outcome of screening one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub job_id: String,
    pub contact: Contact,
    pub score: ScoreResult,
    pub questions: Vec<String>,
    pub status: CandidateStatus,
    pub notes: String,
    pub saved_filename: String,
}

impl CandidateRecord {
    pub fn new(
        job_id: &str,
        contact: Contact,
        score: ScoreResult,
        questions: Vec<String>,
        saved_filename: &str,
    ) -> Self {
        Self {
            job_id: job_id.to_string(),
            contact,
            score,
            questions,
            status: CandidateStatus::Applied,
            notes: String::new(),
            saved_filename: saved_filename.to_string(),
        }
    }

    /// Record written when processing a resume failed: zero score, error text in notes.
    pub fn failed(job_id: &str, saved_filename: &str, error: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            contact: Contact::default(),
            score: ScoreResult::default(),
            questions: Vec::new(),
            status: CandidateStatus::Error,
            notes: error.to_string(),
            saved_filename: saved_filename.to_string(),
        }
    }
}
