//! Merge-safety classification - pure functions
//!
//! Decides, per pull request, whether its source branch can be deleted
//! without losing work. No I/O happens here.

use crate::platform::{FetchedPullRequest, RecordError};
use crate::types::PullRequestRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Why a branch is not a deletion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    /// PR was closed without merging
    NotMerged,
    /// Caller may not delete the branch, or it is already gone
    CannotDeleteBranch,
    /// No trackable merge commit
    NoMergeCommit,
    /// Source branch history not accessible or empty
    NoSourceCommit,
    /// Pull request data could not be decoded
    Malformed(String),
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotMerged => write!(f, "not merged"),
            Self::CannotDeleteBranch => write!(f, "branch cannot be deleted"),
            Self::NoMergeCommit => write!(f, "no merge commit"),
            Self::NoSourceCommit => write!(f, "no commits on source branch"),
            Self::Malformed(reason) => write!(f, "malformed: {reason}"),
        }
    }
}

/// A commit on the branch appears to post-date the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspiciousReason {
    /// Earliest timestamp of the merge commit
    pub merge_time: DateTime<Utc>,
    /// Latest timestamp of the last source branch commit
    pub last_commit_time: DateTime<Utc>,
}

impl std::fmt::Display for SuspiciousReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "merge commit date {} is before last commit date {}",
            self.merge_time, self.last_commit_time
        )
    }
}

/// Outcome of classifying one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Safe to delete the source branch
    Eligible,
    /// Not a candidate
    Ineligible(IneligibleReason),
    /// Merged, but the branch may carry unmerged work
    Suspicious(SuspiciousReason),
}

impl Classification {
    /// Whether the branch may be deleted
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Classify a single pull request (PURE)
///
/// Eligible requires: merged, deletable, merge commit present and last
/// source commit present, and the merge not predating the branch tip.
/// The merge time is the earlier of the merge commit's timestamps and the
/// tip time the later of the last commit's, so divergent authored and
/// committed dates can only make a branch less eligible.
pub fn classify(record: &PullRequestRecord) -> Classification {
    if !record.is_merged {
        return Classification::Ineligible(IneligibleReason::NotMerged);
    }
    if !record.viewer_can_delete_source_branch {
        return Classification::Ineligible(IneligibleReason::CannotDeleteBranch);
    }
    let Some(merge_commit) = &record.merge_commit else {
        return Classification::Ineligible(IneligibleReason::NoMergeCommit);
    };
    let Some(last_commit) = &record.last_source_commit else {
        return Classification::Ineligible(IneligibleReason::NoSourceCommit);
    };

    let merge_time = merge_commit.earliest();
    let last_commit_time = last_commit.latest();

    if merge_time >= last_commit_time {
        Classification::Eligible
    } else {
        Classification::Suspicious(SuspiciousReason {
            merge_time,
            last_commit_time,
        })
    }
}

/// Classifications for a whole run
#[derive(Debug, Clone, Default)]
pub struct ClassificationReport {
    /// PR number to outcome
    pub outcomes: BTreeMap<u64, Classification>,
    eligible: Vec<PullRequestRecord>,
    suspicious: Vec<(PullRequestRecord, SuspiciousReason)>,
    anomaly_count: usize,
    unnumbered_anomalies: usize,
}

impl ClassificationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and record one fetched pull request
    ///
    /// A number seen again replaces its earlier outcome; pages ordered by
    /// update time can repeat a pull request updated mid-fetch.
    pub fn record(&mut self, fetched: FetchedPullRequest) -> Classification {
        match fetched {
            Ok(record) => self.record_pr(record),
            Err(err) => self.record_anomaly(err),
        }
    }

    fn record_pr(&mut self, record: PullRequestRecord) -> Classification {
        let number = record.number;
        self.forget(number);
        let classification = classify(&record);

        match &classification {
            Classification::Eligible => {
                debug!(pr_number = number, branch = %record.source_branch, "eligible for deletion");
                self.insert_eligible(record);
            }
            Classification::Ineligible(reason) => {
                debug!(
                    pr_number = number,
                    title = %record.title,
                    merged = record.is_merged,
                    can_delete = record.viewer_can_delete_source_branch,
                    merge_commit = record.merge_commit.is_some(),
                    last_commit = record.last_source_commit.is_some(),
                    %reason,
                    "skipping pull request"
                );
            }
            Classification::Suspicious(reason) => {
                debug!(
                    pr_number = number,
                    title = %record.title,
                    "suspicious commit, skipping pull request: {reason}"
                );
                self.suspicious.push((record, *reason));
            }
        }

        self.outcomes.insert(number, classification.clone());
        classification
    }

    /// Record a pull request whose data could not be decoded
    ///
    /// It is treated as ineligible and affects no other record.
    pub fn record_anomaly(&mut self, err: RecordError) -> Classification {
        error!(
            pr_number = ?err.number,
            title = ?err.title,
            "error processing pull request: {}",
            err.reason
        );
        self.anomaly_count += 1;

        let classification = Classification::Ineligible(IneligibleReason::Malformed(err.reason));
        match err.number {
            Some(number) => {
                self.forget(number);
                self.outcomes.insert(number, classification.clone());
            }
            None => self.unnumbered_anomalies += 1,
        }
        classification
    }

    fn forget(&mut self, number: u64) {
        let Some(previous) = self.outcomes.remove(&number) else {
            return;
        };
        match previous {
            Classification::Eligible => self.eligible.retain(|r| r.number != number),
            Classification::Suspicious(_) => self.suspicious.retain(|(r, _)| r.number != number),
            Classification::Ineligible(IneligibleReason::Malformed(_)) => {
                self.anomaly_count = self.anomaly_count.saturating_sub(1);
            }
            Classification::Ineligible(_) => {}
        }
    }

    /// Insert keeping ascending merge commit time; equal times keep arrival order
    fn insert_eligible(&mut self, record: PullRequestRecord) {
        let key = merge_committed_at(&record);
        let index = self
            .eligible
            .partition_point(|r| merge_committed_at(r) <= key);
        self.eligible.insert(index, record);
    }

    /// Eligible pull requests, oldest merge commit first
    pub fn eligible(&self) -> &[PullRequestRecord] {
        &self.eligible
    }

    /// Suspicious pull requests in fetch order
    pub fn suspicious(&self) -> &[(PullRequestRecord, SuspiciousReason)] {
        &self.suspicious
    }

    /// Look up the outcome for a PR number
    pub fn get(&self, number: u64) -> Option<&Classification> {
        self.outcomes.get(&number)
    }

    /// Number of eligible pull requests
    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    /// Number of suspicious pull requests
    pub fn suspicious_count(&self) -> usize {
        self.suspicious.len()
    }

    /// Number of ineligible pull requests (anomalies included)
    pub fn ineligible_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|c| matches!(c, Classification::Ineligible(_)))
            .count()
            + self.unnumbered_anomalies
    }

    /// Number of pull requests that could not be decoded
    pub const fn anomaly_count(&self) -> usize {
        self.anomaly_count
    }

    /// Number of pull requests classified
    pub fn total(&self) -> usize {
        self.outcomes.len() + self.unnumbered_anomalies
    }
}

fn merge_committed_at(record: &PullRequestRecord) -> Option<DateTime<Utc>> {
    record.merge_commit.as_ref().map(|c| c.committed_at)
}

/// Classify a batch of fetched pull requests (PURE apart from logging)
pub fn classify_all<I>(items: I) -> ClassificationReport
where
    I: IntoIterator<Item = FetchedPullRequest>,
{
    let mut report = ClassificationReport::new();
    for item in items {
        report.record(item);
    }
    report
}
