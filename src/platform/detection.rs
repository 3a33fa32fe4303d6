//! Repository detection from remote URLs and `owner/repo` arguments

use crate::error::{Error, Result};
use crate::types::RepoSlug;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// scp-like SSH syntax: `user@host:path`
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@([^:/]+):(.+)$").expect("valid regex")
});

/// Parse a git remote URL into a repository slug
///
/// Supports:
/// - `git@github.com:owner/repo.git`
/// - `ssh://git@github.com/owner/repo.git`
/// - `https://github.com/owner/repo(.git)`
///
/// Trailing slashes and a trailing `.git` are stripped.
pub fn parse_repo_info(url: &str) -> Result<RepoSlug> {
    let url = url.trim();

    let (host, path) = if let Some(caps) = SCP_LIKE.captures(url) {
        (caps[1].to_string(), caps[2].to_string())
    } else {
        let parsed = Url::parse(url).map_err(|_| Error::InvalidRemoteUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "https" | "http" | "ssh" | "git") {
            return Err(Error::InvalidRemoteUrl(url.to_string()));
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::InvalidRemoteUrl(url.to_string()))?
            .to_string();
        (host, parsed.path().to_string())
    };

    let (owner, repo) =
        split_owner_repo(&path).ok_or_else(|| Error::InvalidRemoteUrl(url.to_string()))?;
    Ok(RepoSlug::new(owner, repo).with_host(Some(host)))
}

/// Parse an explicit `owner/repo` argument
pub fn parse_repo_arg(arg: &str) -> Result<RepoSlug> {
    let mut parts = arg.trim().split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if is_segment(owner) && is_segment(repo) => {
            Ok(RepoSlug::new(owner, repo))
        }
        _ => Err(Error::InvalidRepoArg(arg.to_string())),
    }
}

fn split_owner_repo(path: &str) -> Option<(String, String)> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;
    (is_segment(owner) && is_segment(repo) && !repo.contains('/'))
        .then(|| (owner.to_string(), repo.to_string()))
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_ssh() {
        let slug = parse_repo_info("git@github.com:owner/repo.git").unwrap();
        assert_eq!(slug.owner, "owner");
        assert_eq!(slug.repo, "repo");
        assert_eq!(slug.host, None);
    }

    #[test]
    fn test_github_ssh_url_scheme() {
        let slug = parse_repo_info("ssh://git@github.com/owner/repo.git").unwrap();
        assert_eq!(slug.owner, "owner");
        assert_eq!(slug.repo, "repo");
    }

    #[test]
    fn test_enterprise_host_kept() {
        let slug = parse_repo_info("https://git.example.com/team/tool.git").unwrap();
        assert_eq!(slug.host.as_deref(), Some("git.example.com"));
        assert_eq!(slug.to_string(), "team/tool");
    }

    #[test]
    fn test_dotted_repo_name() {
        let slug = parse_repo_info("https://github.com/owner/site.github.io").unwrap();
        assert_eq!(slug.repo, "site.github.io");
    }

    #[test]
    fn test_nested_path_rejected() {
        let result = parse_repo_info("https://github.com/a/b/c");
        assert!(matches!(result, Err(Error::InvalidRemoteUrl(_))));
    }

    #[test]
    fn test_repo_arg() {
        let slug = parse_repo_arg("rust-lang/cargo").unwrap();
        assert_eq!(slug, RepoSlug::new("rust-lang", "cargo"));

        assert!(matches!(parse_repo_arg("cargo"), Err(Error::InvalidRepoArg(_))));
        assert!(matches!(parse_repo_arg("a/b/c"), Err(Error::InvalidRepoArg(_))));
        assert!(matches!(parse_repo_arg("/cargo"), Err(Error::InvalidRepoArg(_))));
    }
}
