//! Job descriptions: loading the active description from disk and the
//! optional model-backed rewrite.

pub mod handlers;
mod prompts;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::llm_client::prompts::{render_prompt, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{CompletionClient, LlmError};
use prompts::{OPTIMIZER_ROLE, OPTIMIZE_PROMPT_TEMPLATE};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job description not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read job description at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the job description text.
pub async fn load_job_description(path: &Path) -> Result<String, JobError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(JobError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(JobError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Asks the model for a clearer, less biased rewrite of `description`.
pub async fn optimize_job_description(
    client: &dyn CompletionClient,
    description: &str,
) -> Result<String, LlmError> {
    let prompt = render_prompt(OPTIMIZE_PROMPT_TEMPLATE, &[("job_description", description)]);
    let system = format!("{OPTIMIZER_ROLE}\n\n{PLAIN_TEXT_SYSTEM}");

    let rewritten = client.complete(&prompt, &system).await?;
    let rewritten = rewritten.trim();
    if rewritten.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    info!(
        input_chars = description.len(),
        output_chars = rewritten.len(),
        "job description optimized"
    );
    Ok(rewritten.to_string())
}
