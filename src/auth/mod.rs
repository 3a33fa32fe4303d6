//! Authentication for GitHub
//!
//! Supports environment variables and the GitHub CLI.

mod github;

pub use github::{GitHubAuthConfig, TOKEN_ENV_VARS, get_github_auth, token_from_env};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}
