//! Progress reporting for long-running phases

use crate::reap::DeletionOutcome;
use crate::types::PullRequestRecord;
use async_trait::async_trait;

/// Callback for progress during fetch and deletion
///
/// All methods default to doing nothing.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A free-form status message
    async fn on_message(&self, _message: &str) {}

    /// Total number of pull requests the fetch will produce
    async fn on_total(&self, _total: u64) {}

    /// One pull request was fetched and classified
    async fn on_fetched(&self, _number: Option<u64>) {}

    /// One branch deletion finished
    async fn on_deleted(&self, _record: &PullRequestRecord, _outcome: &DeletionOutcome) {}
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

#[async_trait]
impl ProgressCallback for NoProgress {}
