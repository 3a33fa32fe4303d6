//! gh-reaper - delete the remote branches of merged GitHub pull requests

mod cli;

use clap::Parser;
use cli::clean::{CleanOptions, run_clean};
use cli::style::Stylize;
use gh_reaper::reap::{DEFAULT_JOBS, ReapOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Delete the remote branches of merged GitHub pull requests
///
/// A branch is offered for deletion only when its pull request was merged,
/// you may delete it, and no commit on it post-dates the merge.
#[derive(Parser, Debug)]
#[command(name = "gh-reaper", version, about, long_about)]
struct Cli {
    /// Repository as owner/repo (default: detected from the origin remote)
    repo: Option<String>,

    /// Path to the working copy used to detect the repository
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the HTTP response cache for GitHub API requests
    #[arg(long)]
    nocache: bool,

    /// List deletable branches without prompting to delete them
    #[arg(long)]
    dry_run: bool,

    /// Number of concurrent branch deletions
    #[arg(long, default_value_t = DEFAULT_JOBS)]
    jobs: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::logging::init(cli.verbose);

    let options = CleanOptions {
        no_cache: cli.nocache,
        dry_run: cli.dry_run,
        reap: ReapOptions { jobs: cli.jobs },
    };

    match run_clean(&cli.path, cli.repo.as_deref(), options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
