use std::sync::Arc;

use crate::candidates::store::CandidateStore;
use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::pipeline::Pipeline;
use crate::scoring::build_scorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<CandidateStore>,
    pub pipeline: Arc<Pipeline>,
    /// Present only when a model credential is configured. Selects delegated
    /// scoring and enables the job-description optimizer.
    pub llm: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    pub fn new(config: Config, llm: Option<Arc<dyn CompletionClient>>) -> Self {
        let store = Arc::new(CandidateStore::new(config.candidate_store_path.clone()));
        let scorer = build_scorer(config.skills.clone(), llm.clone(), config.llm_timeout);
        let pipeline = Arc::new(Pipeline::new(scorer, Arc::clone(&store), config.job_title.clone()));

        Self {
            config: Arc::new(config),
            store,
            pipeline,
            llm,
        }
    }
}
