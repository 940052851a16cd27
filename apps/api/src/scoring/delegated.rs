use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::prompts::{SCORING_PROMPT_TEMPLATE, SCORING_ROLE};
use super::{RuleBasedScorer, ScoreCard, Scorer};
use crate::llm_client::prompts::{render_prompt, JSON_ONLY_SYSTEM};
use crate::llm_client::{extract_json_object, CompletionClient, LlmError};

/// Scores via the generative model, composing a `RuleBasedScorer` as its fallback.
///
/// The model call is the only suspension point and is bounded by `timeout`.
/// Failure, timeout, or a response with no JSON object all yield the
/// rule-based score for the same input.
pub struct DelegatedScorer {
    client: Arc<dyn CompletionClient>,
    fallback: RuleBasedScorer,
    timeout: Duration,
}

impl DelegatedScorer {
    pub fn new(client: Arc<dyn CompletionClient>, fallback: RuleBasedScorer, timeout: Duration) -> Self {
        Self {
            client,
            fallback,
            timeout,
        }
    }

    async fn request_score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ScoreCard, LlmError> {
        let prompt = render_prompt(
            SCORING_PROMPT_TEMPLATE,
            &[
                ("job_description", job_description),
                ("resume_text", resume_text),
            ],
        );
        let system = format!("{SCORING_ROLE} {JSON_ONLY_SYSTEM}");

        let response = tokio::time::timeout(self.timeout, self.client.complete(&prompt, &system))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        let json = extract_json_object(&response).ok_or(LlmError::MissingJson)?;
        let value: serde_json::Value = serde_json::from_str(json)?;
        ScoreCard::from_json(&value).ok_or(LlmError::MissingJson)
    }
}

#[async_trait]
impl Scorer for DelegatedScorer {
    async fn score(&self, resume_text: &str, job_description: &str) -> ScoreCard {
        match self.request_score(resume_text, job_description).await {
            Ok(card) => {
                debug!("delegated score accepted: {:?}", card.total_score);
                card
            }
            Err(err) => {
                warn!("delegated scoring failed, falling back to rule-based: {err}");
                self.fallback.score(resume_text, job_description).await
            }
        }
    }

    fn backend(&self) -> &'static str {
        "delegated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SkillVocabulary;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct FakeClient {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail => Err(LlmError::Api {
                    status: 400,
                    message: "bad request".to_string(),
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("{}".to_string())
                }
            }
        }
    }

    fn rule_based() -> RuleBasedScorer {
        RuleBasedScorer::new(SkillVocabulary::new(["python", "sql"], 5, 2))
    }

    fn delegated(client: Arc<FakeClient>) -> DelegatedScorer {
        DelegatedScorer::new(client, rule_based(), Duration::from_secs(5))
    }

    const RESUME: &str = "Jane Doe\nPython developer";
    const JOB: &str = "Backend role needing Python and SQL";

    #[tokio::test]
    async fn test_non_json_reply_matches_rule_based() {
        let scorer = delegated(FakeClient::new(Reply::Text("This candidate looks great!")));

        let card = scorer.score(RESUME, JOB).await;
        let expected: ScoreCard = rule_based().evaluate(RESUME).into();
        assert_eq!(card, expected);
    }

    #[tokio::test]
    async fn test_client_error_falls_back() {
        let scorer = delegated(FakeClient::new(Reply::Fail));

        let card = scorer.score(RESUME, JOB).await;
        assert_eq!(card.into_result(), rule_based().evaluate(RESUME));
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let scorer = delegated(FakeClient::new(Reply::Text("{\"total_score\": 9,,}")));

        let card = scorer.score(RESUME, JOB).await;
        assert_eq!(card.into_result(), rule_based().evaluate(RESUME));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let scorer = delegated(FakeClient::new(Reply::Hang));

        let card = scorer.score(RESUME, JOB).await;
        assert_eq!(card.into_result(), rule_based().evaluate(RESUME));
    }

    #[tokio::test]
    async fn test_fenced_json_reply_is_used() {
        let client = FakeClient::new(Reply::Text(
            "```json\n{\"base_score\": 4, \"skill_score\": 6, \"penalty\": 1, \"total_score\": 9, \"missing_skills\": [], \"found_skills\": [\"Python\"]}\n```",
        ));
        let scorer = delegated(client.clone());

        let score = scorer.score(RESUME, JOB).await.into_result();
        assert_eq!(score.total_score, 9);
        assert_eq!(score.penalty, 1);
        assert_eq!(score.found_skills, vec!["python"]);

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(JOB));
        assert!(prompts[0].contains(RESUME));
    }

    #[tokio::test]
    async fn test_placeholder_text_in_job_description_is_kept_literal() {
        let client = FakeClient::new(Reply::Text("{}"));
        let scorer = delegated(client.clone());
        let job = "Paste {resume_text} here; Python required";

        scorer.score(RESUME, job).await;

        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains(job));
        assert_eq!(prompts[0].matches(RESUME).count(), 1);
    }

    #[tokio::test]
    async fn test_partial_json_is_returned_for_repair() {
        let scorer = delegated(FakeClient::new(Reply::Text("{\"total_score\": 12}")));

        let card = scorer.score(RESUME, JOB).await;
        assert_eq!(card.total_score, Some(12));
        assert!(card.found_skills.is_none());
        assert_eq!(scorer.backend(), "delegated");
    }
}
