use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::scoring::SkillVocabulary;

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment yields a working
/// rule-based deployment rooted at `assets/`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resumes_dir: PathBuf,
    pub candidate_store_path: PathBuf,
    pub job_description_path: PathBuf,
    pub job_title: String,
    pub default_job_id: String,
    /// Presence of this key switches scoring to the delegated backend.
    pub anthropic_api_key: Option<String>,
    pub llm_timeout: Duration,
    pub skills: SkillVocabulary,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_timeout_secs = env_or("LLM_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;

        let skills = optional_env("SCREENING_SKILLS")
            .map(|raw| SkillVocabulary::from_list(&raw))
            .filter(|vocabulary| !vocabulary.is_empty())
            .unwrap_or_default();

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            resumes_dir: PathBuf::from(env_or("RESUMES_DIR", "assets/resumes")),
            candidate_store_path: PathBuf::from(env_or(
                "CANDIDATE_STORE_PATH",
                "assets/candidate_data.csv",
            )),
            job_description_path: PathBuf::from(env_or(
                "JOB_DESCRIPTION_PATH",
                "assets/job_description.txt",
            )),
            job_title: env_or("JOB_TITLE", "Backend Engineer"),
            default_job_id: env_or("DEFAULT_JOB_ID", "JOB-001"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            skills,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
