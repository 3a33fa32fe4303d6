//! Shared command context
//!
//! Resolves the repository, authentication and platform service before any
//! pull request is fetched. Every failure here is a setup failure.

use gh_reaper::auth::get_github_auth;
use gh_reaper::error::{Error, Result};
use gh_reaper::platform::{DEFAULT_CACHE_TTL, GitHubService, ResponseCache};
use gh_reaper::repo::locate_repository;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable naming a default GitHub Enterprise host
const HOST_ENV_VAR: &str = "GH_HOST";

/// Shared context for the reap command
pub struct CommandContext {
    /// Full name as reported by the API
    pub full_name: String,
    /// Platform service
    pub platform: GitHubService,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Find a token (warn and continue without one)
    /// - Resolve the repository from `explicit` or the checkout at `path`
    /// - Create the service, with or without the response cache
    /// - Verify the authenticated user and the repository
    pub async fn new(path: &Path, explicit: Option<&str>, use_cache: bool) -> Result<Self> {
        let auth = get_github_auth().await;
        if auth.is_none() {
            warn!("no GITHUB_TOKEN found, unauthenticated requests are rate-limited");
        }

        let default_host = std::env::var(HOST_ENV_VAR).ok().filter(|h| !h.is_empty());
        let repo = locate_repository(path, explicit, default_host)?;

        let cache = if use_cache {
            let cache = ResponseCache::in_user_cache_dir(DEFAULT_CACHE_TTL);
            if let Some(ref c) = cache {
                debug!(dir = %c.dir().display(), "response cache enabled");
            }
            cache
        } else {
            debug!("response cache disabled");
            None
        };

        let token = auth.as_ref().map(|a| a.token.as_str());
        let platform = GitHubService::new(token, repo, cache)?;

        if let Some(ref auth) = auth {
            let login = platform.current_user_login().await.map_err(|e| {
                Error::GitHubApi(format!("Failed to get authenticated user: {e}"))
            })?;
            debug!(login = %login, source = ?auth.source, "authenticated");
        }

        let full_name = platform.verify_repository().await?;

        Ok(Self {
            full_name,
            platform,
        })
    }
}
