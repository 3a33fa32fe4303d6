//! Logging setup
//!
//! The subscriber is installed once at startup and never reconfigured.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,gh_reaper={level}")
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gh_reaper::reap::classify_all;
    use gh_reaper::types::{CommitInfo, PullRequestRecord};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn commit(day: u32) -> CommitInfo {
        let at = Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap();
        CommitInfo {
            oid: "abcdef0123456789".to_string(),
            abbreviated_oid: "abcdef0".to_string(),
            authored_at: at,
            committed_at: at,
        }
    }

    /// Log output of classifying one unmerged and one suspicious PR
    fn classify_logs(verbose: bool) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(default_directive(verbose)))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let unmerged = PullRequestRecord {
            number: 12,
            title: "Abandoned".to_string(),
            source_branch: "abandoned".to_string(),
            is_merged: false,
            viewer_can_delete_source_branch: true,
            merge_commit: None,
            last_source_commit: Some(commit(1)),
            permalink: None,
            author: None,
        };
        let suspicious = PullRequestRecord {
            number: 11,
            title: "Late push".to_string(),
            source_branch: "late".to_string(),
            is_merged: true,
            merge_commit: Some(commit(1)),
            last_source_commit: Some(commit(2)),
            ..unmerged.clone()
        };

        tracing::subscriber::with_default(subscriber, || {
            classify_all(vec![Ok(unmerged), Ok(suspicious)]);
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_default_level_hides_classification_detail() {
        let logs = classify_logs(false);
        assert!(!logs.contains("not merged"), "unexpected logs: {logs}");
        assert!(!logs.contains("suspicious commit"), "unexpected logs: {logs}");
    }

    #[test]
    fn test_verbose_shows_ineligibility_reasons() {
        let logs = classify_logs(true);
        assert!(logs.contains("not merged"), "missing reason in: {logs}");
        assert!(logs.contains("pr_number=12"), "missing number in: {logs}");
        assert!(logs.contains("suspicious commit"), "missing suspicious in: {logs}");
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn,gh_reaper=info");
        assert_eq!(default_directive(true), "warn,gh_reaper=debug");
    }
}
