//! Candidate record store, analytics over it, and the HTTP handlers that read
//! and correct stored candidates.

pub mod analytics;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use anyhow::anyhow;

use crate::errors::AppError;
use store::{CandidateStore, StoreError};

/// Runs a store operation on the blocking pool; the store does synchronous file I/O.
pub async fn with_store<T, F>(store: &Arc<CandidateStore>, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&CandidateStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(&*store))
        .await
        .map_err(|err| AppError::Internal(anyhow!("store task failed: {err}")))?
        .map_err(AppError::from)
}
