//! GitHub token discovery

use super::AuthSource;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order of preference
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// A GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// The token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Pick the first non-empty token from `lookup`, in [`TOKEN_ENV_VARS`] order
pub fn token_from_env<F>(lookup: F) -> Option<GitHubAuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS.iter().find_map(|name| {
        let token = lookup(name)?.trim().to_string();
        if token.is_empty() {
            return None;
        }
        debug!(var = name, "using GitHub token from environment");
        Some(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        })
    })
}

/// Find a GitHub token
///
/// Checks `GITHUB_TOKEN`, then `GH_TOKEN`, then `gh auth token`.
/// Returns `None` when no token is available.
pub async fn get_github_auth() -> Option<GitHubAuthConfig> {
    if let Some(config) = token_from_env(|name| std::env::var(name).ok()) {
        return Some(config);
    }
    token_from_gh_cli().await
}

async fn token_from_gh_cli() -> Option<GitHubAuthConfig> {
    let output = match Command::new("gh").args(["auth", "token"]).output().await {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "gh CLI not available");
            return None;
        }
    };

    if !output.status.success() {
        debug!("gh CLI is not authenticated");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return None;
    }

    debug!("using GitHub token from `gh auth token`");
    Some(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}
