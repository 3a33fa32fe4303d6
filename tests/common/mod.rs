//! Shared fixtures for gh-reaper tests

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::MockPlatformService;

use chrono::{DateTime, TimeZone, Utc};
use gh_reaper::platform::RecordError;
use gh_reaper::types::{CommitInfo, PullRequestRecord};

/// Noon UTC on the given day of January 2024
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
}

/// Commit with distinct authored and committed timestamps
pub fn commit_at(authored: DateTime<Utc>, committed: DateTime<Utc>) -> CommitInfo {
    CommitInfo {
        oid: format!("{:040x}", authored.timestamp()),
        abbreviated_oid: format!("{:07x}", authored.timestamp() % 0x0fff_ffff),
        authored_at: authored,
        committed_at: committed,
    }
}

/// Merged, deletable PR with merge and last commits on the given days
pub fn merged_pr(number: u64, merge_day: u32, last_day: u32) -> PullRequestRecord {
    PullRequestRecord {
        number,
        title: format!("PR {number}"),
        source_branch: format!("feature/{number}"),
        is_merged: true,
        viewer_can_delete_source_branch: true,
        merge_commit: Some(commit_at(day(merge_day), day(merge_day))),
        last_source_commit: Some(commit_at(day(last_day), day(last_day))),
        permalink: Some(format!("https://github.com/acme/widgets/pull/{number}")),
        author: Some("octocat".to_string()),
    }
}

/// PR closed without merging
pub fn closed_pr(number: u64) -> PullRequestRecord {
    PullRequestRecord {
        is_merged: false,
        merge_commit: None,
        ..merged_pr(number, 2, 1)
    }
}

/// Undecodable PR node
pub fn malformed(number: Option<u64>) -> RecordError {
    RecordError {
        number,
        title: number.map(|n| format!("PR {n}")),
        reason: "missing field `merged`".to_string(),
    }
}
