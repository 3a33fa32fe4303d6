//! Repository location
//!
//! Resolves which GitHub repository to operate on, from an explicit
//! `owner/repo` argument or from the `origin` remote of a local git checkout.

use crate::error::{Error, Result};
use crate::platform::{parse_repo_arg, parse_repo_info};
use crate::types::RepoSlug;
use std::path::Path;
use tracing::debug;

/// Remote consulted when no repository is given explicitly
pub const DEFAULT_REMOTE: &str = "origin";

/// Fetch URL of the `origin` remote of the git repository containing `path`
///
/// Parent directories are searched for the repository.
pub fn locate_origin_url(path: &Path) -> Result<String> {
    let repo = gix::discover(path)
        .map_err(|e| Error::NotARepository(format!("{}: {e}", path.display())))?;
    debug!(git_dir = %repo.git_dir().display(), "found git repository");

    let remote = repo
        .find_remote(DEFAULT_REMOTE)
        .map_err(|_| Error::RemoteNotFound(DEFAULT_REMOTE.to_string()))?;
    let url = remote
        .url(gix::remote::Direction::Fetch)
        .ok_or_else(|| Error::RemoteNotFound(DEFAULT_REMOTE.to_string()))?;

    Ok(url.to_bstring().to_string())
}

/// Resolve the repository to operate on
///
/// An explicit `owner/repo` wins; `default_host` (e.g. from `GH_HOST`) applies
/// to it. Otherwise the `origin` remote of the checkout at `path` is used.
pub fn locate_repository(
    path: &Path,
    explicit: Option<&str>,
    default_host: Option<String>,
) -> Result<RepoSlug> {
    if let Some(arg) = explicit {
        let slug = parse_repo_arg(arg)?.with_host(default_host);
        debug!(repo = %slug, "using explicit repository");
        return Ok(slug);
    }

    let url = locate_origin_url(path)?;
    debug!(url = %url, "detected origin remote");
    parse_repo_info(&url)
}
