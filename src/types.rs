//! Core types for gh-reaper

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as seen through the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full object ID
    pub oid: String,
    /// Short object ID (display only)
    pub abbreviated_oid: String,
    /// When the change was originally written
    pub authored_at: DateTime<Utc>,
    /// When the commit object was last written (changes on rebase/amend)
    pub committed_at: DateTime<Utc>,
}

impl CommitInfo {
    /// Earliest of the authored and committed timestamps
    pub fn earliest(&self) -> DateTime<Utc> {
        self.authored_at.min(self.committed_at)
    }

    /// Latest of the authored and committed timestamps
    pub fn latest(&self) -> DateTime<Utc> {
        self.authored_at.max(self.committed_at)
    }
}

/// A closed or merged pull request
///
/// Built once from the API response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// PR number (record identity)
    pub number: u64,
    /// PR title
    pub title: String,
    /// Branch the PR was opened from (may no longer exist)
    pub source_branch: String,
    /// Whether the PR was merged (false = closed without merging)
    pub is_merged: bool,
    /// Whether the caller may delete the source branch and it still exists
    pub viewer_can_delete_source_branch: bool,
    /// Commit that performed the merge
    pub merge_commit: Option<CommitInfo>,
    /// Newest commit on the source branch at fetch time
    pub last_source_commit: Option<CommitInfo>,
    /// Web URL of the PR
    pub permalink: Option<String>,
    /// Login of the PR author
    pub author: Option<String>,
}

/// The remote repository a run operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl RepoSlug {
    /// Create a slug for github.com
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            host: None,
        }
    }

    /// Set a custom host, treating `github.com` as the default
    #[must_use]
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host.filter(|h| h != "github.com");
        self
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
