//! gh-reaper: delete the remote branches of merged GitHub pull requests
//!
//! A branch is only offered for deletion when its pull request was merged,
//! the caller may delete it, and no commit on it post-dates the merge.

pub mod auth;
pub mod confirm;
pub mod error;
pub mod platform;
pub mod progress;
pub mod reap;
pub mod repo;
pub mod types;
