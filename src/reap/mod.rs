//! Branch reaping engine
//!
//! Three-phase pattern:
//! 1. Gather - fetch closed pull requests page by page (effectful)
//! 2. Classify - decide per pull request whether its branch is safe to delete (pure)
//! 3. Execute - delete the accepted branches (effectful, bounded concurrency)

mod classify;
mod execute;
mod gather;

pub use classify::{
    Classification, ClassificationReport, IneligibleReason, SuspiciousReason, classify,
    classify_all,
};
pub use execute::{
    DEFAULT_JOBS, DELETE_PROMPT, DeletionOutcome, ReapDecision, ReapOptions, ReapReport, reap,
    reap_confirmed,
};
pub use gather::{closed_pr_pages, closed_pull_requests, gather_report};
