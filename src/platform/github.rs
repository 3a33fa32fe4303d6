//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{
    FetchedPullRequest, PlatformService, PullRequestPage, RecordError, ResponseCache,
};
use crate::types::{CommitInfo, PullRequestRecord, RepoSlug};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

/// Pull requests requested per GraphQL page
const PAGE_SIZE: u32 = 100;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CLOSED_PRS_QUERY: &str = r"
    fragment commitFields on Commit {
        oid
        abbreviatedOid
        authoredDate
        committedDate
    }

    query ClosedPullRequests($owner: String!, $repo: String!, $first: Int!, $after: String) {
        repository(owner: $owner, name: $repo) {
            pullRequests(
                first: $first
                after: $after
                orderBy: { field: UPDATED_AT, direction: DESC }
                states: [CLOSED, MERGED]
            ) {
                totalCount
                pageInfo {
                    endCursor
                    hasNextPage
                }
                nodes {
                    number
                    title
                    headRefName
                    merged
                    viewerCanDeleteHeadRef
                    permalink
                    author {
                        login
                    }
                    mergeCommit {
                        ...commitFields
                    }
                    lastCommits: commits(last: 1) {
                        totalCount
                        nodes {
                            commit {
                                ...commitFields
                            }
                        }
                    }
                }
            }
        }
    }
";

// GraphQL response types for the closed pull request query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct RepositoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_requests: PullRequestConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    total_count: u64,
    page_info: PageInfo,
    // Decoded one by one so a single bad node cannot fail the page
    nodes: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    title: String,
    head_ref_name: String,
    merged: bool,
    viewer_can_delete_head_ref: bool,
    permalink: Option<String>,
    author: Option<GraphQlActor>,
    merge_commit: Option<GraphQlCommit>,
    last_commits: Option<CommitConnection>,
}

#[derive(Deserialize)]
struct GraphQlActor {
    login: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitConnection {
    total_count: u64,
    nodes: Vec<PullRequestCommitNode>,
}

#[derive(Deserialize)]
struct PullRequestCommitNode {
    commit: GraphQlCommit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlCommit {
    oid: String,
    abbreviated_oid: String,
    authored_date: DateTime<Utc>,
    committed_date: DateTime<Utc>,
}

impl From<GraphQlCommit> for CommitInfo {
    fn from(c: GraphQlCommit) -> Self {
        Self {
            oid: c.oid,
            abbreviated_oid: c.abbreviated_oid,
            authored_at: c.authored_date,
            committed_at: c.committed_date,
        }
    }
}

impl From<GraphQlPullRequest> for PullRequestRecord {
    fn from(pr: GraphQlPullRequest) -> Self {
        let last_source_commit = pr
            .last_commits
            .filter(|c| c.total_count > 0)
            .and_then(|c| c.nodes.into_iter().last())
            .map(|n| n.commit.into());

        Self {
            number: pr.number,
            title: pr.title,
            source_branch: pr.head_ref_name,
            is_merged: pr.merged,
            viewer_can_delete_source_branch: pr.viewer_can_delete_head_ref,
            merge_commit: pr.merge_commit.map(Into::into),
            last_source_commit,
            permalink: pr.permalink,
            author: pr.author.map(|a| a.login),
        }
    }
}

/// Decode one pull request node, keeping number and title for error reports
fn decode_node(node: Value) -> FetchedPullRequest {
    let number = node.get("number").and_then(Value::as_u64);
    let title = node
        .get("title")
        .and_then(Value::as_str)
        .map(String::from);

    if node.is_null() {
        return Err(RecordError {
            number,
            title,
            reason: "null pull request node".to_string(),
        });
    }

    serde_json::from_value::<GraphQlPullRequest>(node)
        .map(PullRequestRecord::from)
        .map_err(|e| RecordError {
            number,
            title,
            reason: e.to_string(),
        })
}

/// GitHub service using octocrab and raw HTTP
pub struct GitHubService {
    client: Octocrab,
    repo: RepoSlug,
    /// Token for raw HTTP requests, if authenticated
    token: Option<String>,
    /// HTTP client for GraphQL and ref deletion
    http_client: Client,
    /// REST API base, e.g. `https://api.github.com`
    rest_base: String,
    /// GraphQL endpoint
    graphql_url: String,
    cache: Option<ResponseCache>,
}

impl GitHubService {
    /// Create a new GitHub service for `repo`
    ///
    /// `repo.host` selects GitHub Enterprise endpoints; `None` means github.com.
    pub fn new(token: Option<&str>, repo: RepoSlug, cache: Option<ResponseCache>) -> Result<Self> {
        let (rest_base, graphql_url) = repo.host.as_ref().map_or_else(
            || {
                (
                    "https://api.github.com".to_string(),
                    "https://api.github.com/graphql".to_string(),
                )
            },
            |h| (format!("https://{h}/api/v3"), format!("https://{h}/api/graphql")),
        );
        Self::with_endpoints(token, repo, &rest_base, &graphql_url, cache)
    }

    /// Create a service against explicit REST and GraphQL endpoints
    pub fn with_endpoints(
        token: Option<&str>,
        repo: RepoSlug,
        rest_base: &str,
        graphql_url: &str,
        cache: Option<ResponseCache>,
    ) -> Result<Self> {
        let rest_base = rest_base.trim_end_matches('/').to_string();

        let mut builder = Octocrab::builder()
            .base_uri(rest_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("gh-reaper")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            repo,
            token: token.map(String::from),
            http_client,
            rest_base,
            graphql_url: graphql_url.to_string(),
            cache,
        })
    }

    /// Check that the repository exists and is reachable, returning its full name
    pub async fn verify_repository(&self) -> Result<String> {
        debug!(repo = %self.repo, "verifying repository");
        let repository = self
            .client
            .repos(&self.repo.owner, &self.repo.repo)
            .get()
            .await
            .map_err(|e| {
                Error::GitHubApi(format!(
                    "Failed to load repository {}: {}",
                    self.repo,
                    Error::from(e)
                ))
            })?;

        Ok(repository
            .full_name
            .unwrap_or_else(|| self.repo.to_string()))
    }

    /// Login of the authenticated user
    pub async fn current_user_login(&self) -> Result<String> {
        let user = self.client.current().user().await?;
        Ok(user.login)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Cache key for a GraphQL body, scoped to the endpoint and the token
    fn cache_key(&self, body: &Value) -> String {
        let token = self.token.as_deref().map_or_else(
            || "anonymous".to_string(),
            |token| {
                let mut hasher = DefaultHasher::new();
                token.hash(&mut hasher);
                format!("{:016x}", hasher.finish())
            },
        );
        format!("{}\n{token}\n{body}", self.graphql_url)
    }

    /// Run the GraphQL query, consulting the response cache
    async fn graphql(&self, body: &Value) -> Result<Value> {
        let key = self.cache_key(body);
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            return Ok(cached);
        }

        let response = self
            .request(self.http_client.post(&self.graphql_url))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "GraphQL request failed ({status}): {text}"
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse GraphQL response: {e}")))?;

        let has_errors = value
            .get("errors")
            .and_then(Value::as_array)
            .is_some_and(|errors| !errors.is_empty());
        if !has_errors
            && let Some(cache) = &self.cache
            && let Err(e) = cache.put(&key, &value)
        {
            debug!(error = %e, "failed to cache response");
        }

        Ok(value)
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn fetch_closed_prs_page(&self, after: Option<&str>) -> Result<PullRequestPage> {
        debug!(repo = %self.repo, after, "fetching closed pull requests");
        let body = serde_json::json!({
            "query": CLOSED_PRS_QUERY,
            "variables": {
                "owner": self.repo.owner,
                "repo": self.repo.repo,
                "first": PAGE_SIZE,
                "after": after,
            }
        });

        let value = self.graphql(&body).await?;
        let response: GraphQlResponse<RepositoryData> = serde_json::from_value(value)
            .map_err(|e| Error::GitHubApi(format!("Unexpected GraphQL response: {e}")))?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let connection = response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| Error::GitHubApi(format!("Repository {} not found", self.repo)))?
            .pull_requests;

        let items: Vec<FetchedPullRequest> =
            connection.nodes.into_iter().map(decode_node).collect();

        debug!(
            count = items.len(),
            total = connection.total_count,
            has_next_page = connection.page_info.has_next_page,
            "fetched page"
        );

        Ok(PullRequestPage {
            items,
            total_count: connection.total_count,
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
        })
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "deleting branch");
        let encoded: Vec<_> = branch
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let url = format!(
            "{}/repos/{}/{}/git/refs/heads/{}",
            self.rest_base,
            self.repo.owner,
            self.repo.repo,
            encoded.join("/")
        );

        let response = self.request(self.http_client.delete(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or(text);
            warn!(branch, %status, "branch deletion rejected");
            return Err(Error::GitHubApi(format!(
                "Failed to delete {branch} ({status}): {message}"
            )));
        }

        // Cached pages may still list the branch as deletable
        if let Some(cache) = &self.cache
            && let Err(e) = cache.clear()
        {
            warn!(error = %e, "failed to clear response cache");
        }

        debug!(branch, "deleted branch");
        Ok(())
    }

    fn repo(&self) -> &RepoSlug {
        &self.repo
    }
}
