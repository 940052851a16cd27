use async_trait::async_trait;

use super::{normalize_skills, ScoreCard, ScoreResult, Scorer};

const DEFAULT_SKILLS: [&str; 10] = [
    "python",
    "sql",
    "rest api",
    "api",
    "docker",
    "aws",
    "kubernetes",
    "django",
    "flask",
    "graphql",
];
const DEFAULT_BASE_SCORE: i64 = 5;
const DEFAULT_SKILL_WEIGHT: i64 = 2;

/// The fixed, ordered set of skills rule-based scoring looks for, with its weights.
/// Built once from config and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    skills: Vec<String>,
    base_score: i64,
    skill_weight: i64,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS, DEFAULT_BASE_SCORE, DEFAULT_SKILL_WEIGHT)
    }
}

impl SkillVocabulary {
    /// Skills are lower-cased, trimmed and de-duplicated; order is kept.
    pub fn new<'a>(
        skills: impl IntoIterator<Item = &'a str>,
        base_score: i64,
        skill_weight: i64,
    ) -> Self {
        Self {
            skills: normalize_skills(skills),
            base_score,
            skill_weight,
        }
    }

    /// Parses a comma-separated skill list, keeping the default weights.
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','), DEFAULT_BASE_SCORE, DEFAULT_SKILL_WEIGHT)
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn base_score(&self) -> i64 {
        self.base_score
    }

    pub fn skill_weight(&self) -> i64 {
        self.skill_weight
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Pure-Rust keyword scorer. Fast, deterministic, no LLM call.
///
/// Algorithm:
/// 1. Lower-case the resume text.
/// 2. Each vocabulary skill contained in it (substring match) is found, the rest missing.
/// 3. total = base + found × weight − penalty, with penalty currently always 0.
#[derive(Debug, Clone)]
pub struct RuleBasedScorer {
    vocabulary: SkillVocabulary,
}

impl RuleBasedScorer {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn evaluate(&self, resume_text: &str) -> ScoreResult {
        let text = resume_text.to_lowercase();

        let (found_skills, missing_skills): (Vec<String>, Vec<String>) = self
            .vocabulary
            .skills()
            .iter()
            .cloned()
            .partition(|skill| text.contains(skill.as_str()));

        let base_score = self.vocabulary.base_score();
        let skill_score = found_skills.len() as i64 * self.vocabulary.skill_weight();
        let penalty = 0;

        ScoreResult {
            base_score,
            skill_score,
            penalty,
            total_score: base_score + skill_score - penalty,
            missing_skills,
            found_skills,
        }
    }
}

#[async_trait]
impl Scorer for RuleBasedScorer {
    async fn score(&self, resume_text: &str, _job_description: &str) -> ScoreCard {
        self.evaluate(resume_text).into()
    }

    fn backend(&self) -> &'static str {
        "rule_based"
    }
}
