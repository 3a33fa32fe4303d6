//! Pull request gathering - lazy, paginated fetch
//!
//! Pages are requested one at a time, only once the previous page has been
//! consumed.

use crate::error::Result;
use crate::platform::{FetchedPullRequest, PlatformService, PullRequestPage};
use crate::progress::ProgressCallback;
use crate::reap::classify::ClassificationReport;
use futures_util::{Stream, TryStreamExt, stream};

enum Cursor {
    Start,
    After(String),
    Done,
}

/// Lazy sequence of closed/merged pull request pages
pub fn closed_pr_pages(
    platform: &dyn PlatformService,
) -> impl Stream<Item = Result<PullRequestPage>> + Send + '_ {
    stream::try_unfold(Cursor::Start, move |cursor| async move {
        let after = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::After(c) => Some(c),
        };

        let page = platform.fetch_closed_prs_page(after.as_deref()).await?;

        // A repeated cursor would loop forever
        let next = match &page.end_cursor {
            Some(c) if page.has_next_page && after.as_ref() != Some(c) => Cursor::After(c.clone()),
            _ => Cursor::Done,
        };
        Ok(Some((page, next)))
    })
}

/// Lazy sequence of all closed/merged pull requests
pub fn closed_pull_requests(
    platform: &dyn PlatformService,
) -> impl Stream<Item = Result<FetchedPullRequest>> + Send + '_ {
    closed_pr_pages(platform)
        .map_ok(|page| stream::iter(page.items.into_iter().map(Ok)))
        .try_flatten()
}

/// Fetch every closed/merged pull request and classify it
///
/// A transport error on any page aborts with that error; undecodable pull
/// requests are recorded as anomalies and the fetch continues.
pub async fn gather_report(
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> Result<ClassificationReport> {
    let mut report = ClassificationReport::new();
    let mut pages = std::pin::pin!(closed_pr_pages(platform));
    let mut page_count = 0usize;

    while let Some(page) = pages.try_next().await? {
        if page_count == 0 {
            progress.on_total(page.total_count).await;
        }
        page_count += 1;
        progress
            .on_message(&format!("Classifying page {page_count}"))
            .await;
        for item in page.items {
            let number = match &item {
                Ok(record) => Some(record.number),
                Err(err) => err.number,
            };
            report.record(item);
            progress.on_fetched(number).await;
        }
    }

    Ok(report)
}
