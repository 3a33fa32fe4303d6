//! Platform services for GitHub
//!
//! Provides the seam between the reaper and the remote API.

mod cache;
mod detection;
mod github;

pub use cache::{DEFAULT_CACHE_TTL, ResponseCache};
pub use detection::{parse_repo_arg, parse_repo_info};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PullRequestRecord, RepoSlug};
use async_trait::async_trait;

/// A pull request node that could not be decoded into a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed pull request: {reason}")]
pub struct RecordError {
    /// PR number, if it could be read
    pub number: Option<u64>,
    /// PR title, if it could be read
    pub title: Option<String>,
    /// What was wrong with the node
    pub reason: String,
}

/// One decoded pull request, or the reason it could not be decoded
pub type FetchedPullRequest = std::result::Result<PullRequestRecord, RecordError>;

/// One page of closed/merged pull requests
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    /// Pull requests on this page
    pub items: Vec<FetchedPullRequest>,
    /// Total number of closed/merged pull requests in the repository
    pub total_count: u64,
    /// Cursor to pass for the next page
    pub end_cursor: Option<String>,
    /// Whether another page follows
    pub has_next_page: bool,
}

/// Platform service trait for the operations the reaper needs
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch one page of closed and merged pull requests, newest update first
    ///
    /// `after` is the `end_cursor` of the previous page, or `None` for the
    /// first page. A node that cannot be decoded becomes an `Err` item and
    /// does not fail the page.
    async fn fetch_closed_prs_page(&self, after: Option<&str>) -> Result<PullRequestPage>;

    /// Delete a branch on the remote
    async fn delete_branch(&self, branch: &str) -> Result<()>;

    /// The repository this service operates on
    fn repo(&self) -> &RepoSlug;
}
