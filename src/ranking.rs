//! Concurrent ranking of several ZIP codes.
//!
//! Each ZIP's walk is sequential; different ZIPs are walked in parallel,
//! bounded by a semaphore. Histories go through the [`SessionCache`], so a
//! ZIP named twice, or already walked in this session, is walked once.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{Instrument, error, info};

use crate::cache::SessionCache;
use crate::error::RaterResult;
use crate::fetch::Transport;
use crate::report::ZipReport;
use crate::series::{HistoricalSeriesFetcher, SeriesWindow};

/// Ranks `zips` in the order given, dropping repeats. ZIPs whose task fails
/// are logged and left out of the result.
#[tracing::instrument(skip_all, fields(count = zips.len(), concurrency = concurrency))]
pub async fn rank_zips<T: Transport + 'static>(
    fetcher: Arc<HistoricalSeriesFetcher<T>>,
    cache: Arc<SessionCache>,
    zips: Vec<String>,
    window: SeriesWindow,
    concurrency: usize,
) -> RaterResult<Vec<ZipReport>> {
    window.validate()?;

    let mut seen = HashSet::new();
    let zips: Vec<String> = zips.into_iter().filter(|zip| seen.insert(zip.clone())).collect();

    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));
    let mut tasks = vec![];

    for zip in zips {
        let sem = semaphore.clone();
        let fetcher = fetcher.clone();
        let cache = cache.clone();
        let zip_span = tracing::info_span!("rank_zip", zip = %zip);

        let task = tokio::spawn(
            async move {
                let Ok(_permit) = sem.acquire().await else {
                    error!("Semaphore closed");
                    return None;
                };

                match cache.series_or_fetch(&zip, &*fetcher, &window).await {
                    Ok(series) => {
                        let grade = cache.grade(&zip).await;
                        Some(ZipReport::build(&zip, &series, grade))
                    }
                    Err(e) => {
                        error!(error = %e, "Walk refused");
                        None
                    }
                }
            }
            .instrument(zip_span),
        );

        tasks.push(task);
    }

    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) => error!(error = %e, "Rank task panicked"),
        }
    }

    info!(ranked = reports.len(), "Finished ranking ZIP codes");
    Ok(reports)
}
