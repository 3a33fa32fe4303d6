//! Error types for gh-reaper

use thiserror::Error;

/// Errors that abort a run
///
/// Per-record and per-deletion problems are not represented here; they are
/// recovered locally and reported in the classification and reap reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Explicit repository argument is not `owner/repo`
    #[error("invalid repository '{0}': expected the form owner/repo")]
    InvalidRepoArg(String),

    /// Remote URL could not be parsed into owner and repository
    #[error("unsupported remote URL format: {0}")]
    InvalidRemoteUrl(String),

    /// No git repository at or above the given path
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Named remote is missing or has no URL
    #[error("remote '{0}' not found (run inside a git repository with an origin remote)")]
    RemoteNotFound(String),

    /// GitHub API failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Raw HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response cache failure
    #[error("cache error: {0}")]
    Cache(String),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match &e {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message.clone()),
            _ => Self::GitHubApi(e.to_string()),
        }
    }
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
