//! Branch deletion - effectful operations
//!
//! Deletes the source branches of eligible pull requests with bounded
//! concurrency. Each deletion stands alone: a failure is recorded for that
//! branch and never stops the others.

use crate::confirm::Confirmer;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::progress::ProgressCallback;
use crate::types::PullRequestRecord;
use futures_util::{StreamExt, stream};
use tracing::{debug, warn};

/// Default number of concurrent deletions
pub const DEFAULT_JOBS: usize = 8;

/// Options for [`reap`]
#[derive(Debug, Clone, Copy)]
pub struct ReapOptions {
    /// Maximum deletions in flight (values below 1 mean 1)
    pub jobs: usize,
}

impl Default for ReapOptions {
    fn default() -> Self {
        Self { jobs: DEFAULT_JOBS }
    }
}

/// Outcome of deleting one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Branch was deleted
    Deleted,
    /// Deletion failed with this message
    Failed(String),
}

impl DeletionOutcome {
    /// Whether the branch was deleted
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Result of a reap run
#[derive(Debug, Clone, Default)]
pub struct ReapReport {
    /// One entry per input record, in input order
    pub results: Vec<(PullRequestRecord, DeletionOutcome)>,
}

impl ReapReport {
    /// Records whose branches were deleted
    pub fn deleted(&self) -> impl Iterator<Item = &PullRequestRecord> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_deleted())
            .map(|(record, _)| record)
    }

    /// Records whose deletion failed, with the failure message
    pub fn failed(&self) -> impl Iterator<Item = (&PullRequestRecord, &str)> {
        self.results.iter().filter_map(|(record, outcome)| match outcome {
            DeletionOutcome::Failed(message) => Some((record, message.as_str())),
            DeletionOutcome::Deleted => None,
        })
    }

    /// Number of deleted branches
    pub fn deleted_count(&self) -> usize {
        self.deleted().count()
    }

    /// Number of failed deletions
    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Check if every deletion succeeded
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0
    }
}

/// What happened after asking to delete
#[derive(Debug, Clone)]
pub enum ReapDecision {
    /// No eligible branches, nothing was asked
    NothingToDo,
    /// Operator declined; no branch was touched
    Declined,
    /// Deletions ran
    Reaped(ReapReport),
}

/// Prompt shown before any branch is deleted
pub const DELETE_PROMPT: &str = "Delete the remote branches for these pull requests?";

/// Ask for confirmation, then delete the source branches of `eligible`
///
/// Declining performs no deletions and is not an error.
pub async fn reap_confirmed(
    eligible: &[PullRequestRecord],
    platform: &dyn PlatformService,
    options: ReapOptions,
    confirmer: &dyn Confirmer,
    progress: &dyn ProgressCallback,
) -> Result<ReapDecision> {
    if eligible.is_empty() {
        return Ok(ReapDecision::NothingToDo);
    }
    if !confirmer.confirm(DELETE_PROMPT)? {
        debug!(count = eligible.len(), "deletion declined");
        return Ok(ReapDecision::Declined);
    }
    progress.on_total(eligible.len() as u64).await;
    Ok(ReapDecision::Reaped(
        reap(eligible, platform, options, progress).await,
    ))
}

/// Delete the source branches of `eligible` (EFFECTFUL)
///
/// The caller is responsible for confirmation. Failures are not retried and
/// do not make this function fail; they are reported in the [`ReapReport`].
pub async fn reap(
    eligible: &[PullRequestRecord],
    platform: &dyn PlatformService,
    options: ReapOptions,
    progress: &dyn ProgressCallback,
) -> ReapReport {
    let jobs = options.jobs.max(1);
    debug!(repo = %platform.repo(), count = eligible.len(), jobs, "deleting branches");

    let deletions: Vec<_> = eligible
        .iter()
        .enumerate()
        .map(|(index, record)| delete_one(index, record, platform, progress))
        .collect();
    let mut indexed = stream::iter(deletions)
        .buffer_unordered(jobs)
        .collect::<Vec<_>>()
        .await;
    indexed.sort_unstable_by_key(|(index, _)| *index);

    let results = indexed.into_iter().map(|(_, result)| result).collect();
    ReapReport { results }
}

async fn delete_one(
    index: usize,
    record: &PullRequestRecord,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> (usize, (PullRequestRecord, DeletionOutcome)) {
    let outcome = match platform.delete_branch(&record.source_branch).await {
        Ok(()) => {
            debug!(
                pr_number = record.number,
                branch = %record.source_branch,
                "deleted remote branch"
            );
            DeletionOutcome::Deleted
        }
        Err(e) => {
            warn!(
                pr_number = record.number,
                branch = %record.source_branch,
                error = %e,
                "failed to delete remote branch"
            );
            DeletionOutcome::Failed(e.to_string())
        }
    };
    progress.on_deleted(record, &outcome).await;
    (index, (record.clone(), outcome))
}
