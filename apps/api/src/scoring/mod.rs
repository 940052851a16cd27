//! Candidate scoring: a pluggable, trait-based scorer that measures a resume against a job description.
//!
//! Default: `RuleBasedScorer` (pure-Rust keyword matching, deterministic, fully testable).
//! Optional: `DelegatedScorer` (asks the generative model, falls back to the rule-based
//! scorer whenever the call fails, times out, or answers with something that isn't a JSON object).
//!
//! `AppState` holds the pipeline, which holds an `Arc<dyn Scorer>` chosen once at startup.

mod delegated;
mod prompts;
mod rule_based;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::CompletionClient;

pub use delegated::DelegatedScorer;
pub use rule_based::{RuleBasedScorer, SkillVocabulary};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Validated score. For rule-based scoring `total_score = base_score + skill_score - penalty`
/// and the two skill lists partition the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub base_score: i64,
    pub skill_score: i64,
    pub penalty: i64,
    pub total_score: i64,
    pub missing_skills: Vec<String>,
    pub found_skills: Vec<String>,
}

/// Score as a backend produced it, before validation. Delegated scoring can
/// omit any key; the pipeline repairs the gaps with `into_result`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreCard {
    pub base_score: Option<i64>,
    pub skill_score: Option<i64>,
    pub penalty: Option<i64>,
    pub total_score: Option<i64>,
    pub missing_skills: Option<Vec<String>>,
    pub found_skills: Option<Vec<String>>,
}

impl From<ScoreResult> for ScoreCard {
    fn from(score: ScoreResult) -> Self {
        Self {
            base_score: Some(score.base_score),
            skill_score: Some(score.skill_score),
            penalty: Some(score.penalty),
            total_score: Some(score.total_score),
            missing_skills: Some(score.missing_skills),
            found_skills: Some(score.found_skills),
        }
    }
}

impl ScoreCard {
    /// Coerces a model-produced JSON value. Returns `None` unless it is an object.
    ///
    /// Numbers may arrive as integers, floats (truncated) or numeric strings; skill
    /// lists as arrays or a single `,`/`|`/`;` delimited string. Values of any other
    /// type are treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let int = |key: &str| object.get(key).and_then(coerce_int);
        let skills = |key: &str| object.get(key).and_then(coerce_skills);

        Some(Self {
            base_score: int("base_score"),
            skill_score: int("skill_score"),
            penalty: int("penalty"),
            total_score: int("total_score"),
            missing_skills: skills("missing_skills"),
            found_skills: skills("found_skills"),
        })
    }

    /// Names of the keys the backend left out.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_score.is_none() {
            missing.push("base_score");
        }
        if self.skill_score.is_none() {
            missing.push("skill_score");
        }
        if self.penalty.is_none() {
            missing.push("penalty");
        }
        if self.total_score.is_none() {
            missing.push("total_score");
        }
        if self.missing_skills.is_none() {
            missing.push("missing_skills");
        }
        if self.found_skills.is_none() {
            missing.push("found_skills");
        }
        missing
    }

    /// Fills absent keys from the best available value: `base_score` falls back to
    /// `total_score`, `total_score` to `base_score`, everything else to zero/empty.
    pub fn into_result(self) -> ScoreResult {
        let base_score = self.base_score.or(self.total_score).unwrap_or(0);
        ScoreResult {
            base_score,
            skill_score: self.skill_score.unwrap_or(0),
            penalty: self.penalty.unwrap_or(0),
            total_score: self.total_score.unwrap_or(base_score),
            missing_skills: self.missing_skills.unwrap_or_default(),
            found_skills: self.found_skills.unwrap_or_default(),
        }
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn coerce_skills(value: &Value) -> Option<Vec<String>> {
    let raw: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => s.split([',', '|', ';']).collect(),
        _ => return None,
    };
    Some(normalize_skills(raw))
}

/// Trims, lower-cases and de-duplicates skills, keeping first-seen order.
pub(crate) fn normalize_skills<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in raw {
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() && !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The scorer trait. Implementations never fail: every error path degrades
/// to a rule-based score so one resume cannot abort a batch.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, resume_text: &str, job_description: &str) -> ScoreCard;

    /// "rule_based" | "delegated", for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the scoring backend: delegated when a completion client is configured.
pub fn build_scorer(
    vocabulary: SkillVocabulary,
    completion: Option<Arc<dyn CompletionClient>>,
    timeout: Duration,
) -> Arc<dyn Scorer> {
    let rule_based = RuleBasedScorer::new(vocabulary);
    match completion {
        Some(client) => Arc::new(DelegatedScorer::new(client, rule_based, timeout)),
        None => Arc::new(rule_based),
    }
}
