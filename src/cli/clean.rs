//! Clean command - delete branches of merged pull requests

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use crate::cli::{CliProgress, DialoguerConfirmer};
use anstream::println;
use gh_reaper::confirm::Confirmer;
use gh_reaper::error::Result;
use gh_reaper::reap::{
    ClassificationReport, ReapDecision, ReapOptions, ReapReport, gather_report, reap_confirmed,
};
use gh_reaper::types::PullRequestRecord;
use std::path::Path;
use terminal_link::Link;

/// Options for the clean command
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Skip the response cache
    pub no_cache: bool,
    /// List deletable branches, never delete
    pub dry_run: bool,
    /// Concurrent deletions
    pub reap: ReapOptions,
}

/// Run the clean command
pub async fn run_clean(path: &Path, repo: Option<&str>, options: CleanOptions) -> Result<()> {
    let ctx = CommandContext::new(path, repo, !options.no_cache).await?;
    println!(
        "{} {}",
        "Loading data for repository:".emphasis(),
        ctx.full_name.accent()
    );

    let progress = CliProgress::spinner("Fetching closed pull requests...");
    let report = gather_report(&ctx.platform, &progress).await;
    progress.finish();
    let report = report?;

    print_classification_summary(&report);

    let eligible = report.eligible();
    if eligible.is_empty() {
        println!("{}", "No branches to delete.".muted());
        return Ok(());
    }

    if options.dry_run {
        print_eligible(eligible);
        println!();
        println!("{}", "Run without --dry-run to delete.".muted());
        return Ok(());
    }

    let confirmer = DialoguerConfirmer;
    if confirmer.confirm("List the pull requests?")? {
        print_eligible(eligible);
    }

    let progress = CliProgress::pending("Deleting branches");
    let decision = reap_confirmed(
        eligible,
        &ctx.platform,
        options.reap,
        &confirmer,
        &progress,
    )
    .await;
    progress.finish();

    match decision? {
        ReapDecision::NothingToDo => println!("{}", "No branches to delete.".muted()),
        ReapDecision::Declined => println!("{}", "Aborted".muted()),
        ReapDecision::Reaped(reap_report) => print_reap_summary(&reap_report),
    }

    Ok(())
}

fn print_classification_summary(report: &ClassificationReport) {
    println!(
        "Found {} merged pull request(s) with deletable branches",
        report.eligible_count().success()
    );
    println!(
        "  {} checked, {} ineligible, {} suspicious{}",
        report.total().accent(),
        report.ineligible_count().accent(),
        report.suspicious_count().warn(),
        if report.anomaly_count() > 0 {
            format!(", {} unreadable", report.anomaly_count().warn())
        } else {
            String::new()
        }
    );

    for (record, reason) in report.suspicious() {
        println!(
            "  {} #{} {}: {}",
            "Suspicious".warn(),
            record.number,
            record.title,
            reason.to_string().muted()
        );
    }
}

fn print_eligible(records: &[PullRequestRecord]) {
    let hyperlinks = supports_hyperlinks::supports_hyperlinks();

    for record in records {
        let number = format!("#{:<6}", record.number);
        let number = match (&record.permalink, hyperlinks) {
            (Some(url), true) => Link::new(&number, url).to_string(),
            _ => number,
        };
        let (oid, date) = record.merge_commit.as_ref().map_or_else(
            || ("N/A".to_string(), "N/A".to_string()),
            |c| (c.abbreviated_oid.clone(), c.committed_at.to_rfc3339()),
        );
        println!(
            "  {} '{}' on branch {} merged via commit {} on {}",
            number.accent(),
            record.title,
            record.source_branch.accent(),
            oid.accent(),
            date.muted()
        );
    }
}

fn print_reap_summary(report: &ReapReport) {
    println!();
    if report.is_complete() {
        println!(
            "{} Deleted {} branch(es)",
            check(),
            report.deleted_count().accent()
        );
    } else {
        println!(
            "{} Deleted {} branch(es), {} failed",
            "⚠️".warn(),
            report.deleted_count().accent(),
            report.failed_count().warn()
        );
    }

    for record in report.deleted() {
        println!(
            "  {} #{} {}",
            check(),
            record.number,
            record.source_branch.accent()
        );
    }
    for (record, message) in report.failed() {
        println!(
            "  {} #{} {}: {}",
            cross(),
            record.number,
            record.source_branch.warn(),
            message.muted()
        );
    }
}
