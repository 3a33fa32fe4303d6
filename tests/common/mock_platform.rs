//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use gh_reaper::error::{Error, Result};
use gh_reaper::platform::{FetchedPullRequest, PlatformService, PullRequestPage};
use gh_reaper::types::RepoSlug;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Simple mock platform service for testing
///
/// Features:
/// - Pre-seeded pages with generated cursors
/// - Call tracking for verification
/// - Per-branch deletion delays and failures
/// - Peak deletion concurrency tracking
pub struct MockPlatformService {
    repo: RepoSlug,
    pages: Mutex<Vec<Vec<FetchedPullRequest>>>,
    // Call tracking
    fetch_calls: Mutex<Vec<Option<String>>>,
    delete_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_fetch: Mutex<Option<String>>,
    delete_failures: Mutex<HashMap<String, String>>,
    delete_delays: Mutex<HashMap<String, Duration>>,
    // Concurrency tracking
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockPlatformService {
    /// Create an empty mock for `owner/repo`
    pub fn new() -> Self {
        Self {
            repo: RepoSlug::new("acme", "widgets"),
            pages: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            error_on_fetch: Mutex::new(None),
            delete_failures: Mutex::new(HashMap::new()),
            delete_delays: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a mock serving `pages`, in order
    pub fn with_pages(pages: Vec<Vec<FetchedPullRequest>>) -> Self {
        let mock = Self::new();
        *mock.pages.lock().unwrap() = pages;
        mock
    }

    // === Error injection methods ===

    /// Make `fetch_closed_prs_page` return an error
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `delete_branch` fail for one branch
    pub fn fail_delete(&self, branch: &str, msg: &str) {
        self.delete_failures
            .lock()
            .unwrap()
            .insert(branch.to_string(), msg.to_string());
    }

    /// Make `delete_branch` take `delay` for one branch
    pub fn delay_delete(&self, branch: &str, delay: Duration) {
        self.delete_delays
            .lock()
            .unwrap()
            .insert(branch.to_string(), delay);
    }

    // === Call verification methods ===

    /// Cursors `fetch_closed_prs_page` was called with
    pub fn get_fetch_calls(&self) -> Vec<Option<String>> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// Branches `delete_branch` was called with, in call order
    pub fn get_delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// Highest number of deletions in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Assert that no branch deletion was attempted
    pub fn assert_no_deletions(&self) {
        let calls = self.get_delete_calls();
        assert!(
            calls.is_empty(),
            "Expected no delete_branch calls but got: {calls:?}"
        );
    }

    /// Assert that `delete_branch` was called for a branch
    pub fn assert_delete_called(&self, branch: &str) {
        let calls = self.get_delete_calls();
        assert!(
            calls.iter().any(|c| c == branch),
            "Expected delete_branch({branch}) but got: {calls:?}"
        );
    }
}

fn cursor_for(index: usize) -> String {
    format!("cursor-{index}")
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn fetch_closed_prs_page(&self, after: Option<&str>) -> Result<PullRequestPage> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push(after.map(String::from));

        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let pages = self.pages.lock().unwrap();
        let index = match after {
            None => 0,
            Some(cursor) => {
                (0..pages.len())
                    .find(|i| cursor_for(*i) == cursor)
                    .ok_or_else(|| Error::GitHubApi(format!("unknown cursor {cursor}")))?
                    + 1
            }
        };

        let total_count = pages.iter().map(Vec::len).sum::<usize>() as u64;
        let items = pages.get(index).cloned().unwrap_or_default();
        let has_next_page = index + 1 < pages.len();

        Ok(PullRequestPage {
            items,
            total_count,
            end_cursor: Some(cursor_for(index)),
            has_next_page,
        })
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(branch.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delete_delays.lock().unwrap().get(branch).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = self.delete_failures.lock().unwrap().get(branch).cloned();
        match failure {
            Some(msg) => Err(Error::GitHubApi(msg)),
            None => Ok(()),
        }
    }

    fn repo(&self) -> &RepoSlug {
        &self.repo
    }
}
