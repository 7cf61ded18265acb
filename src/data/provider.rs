use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
#[cfg(debug_assertions)]
use tokio::time::Instant;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::PROVIDER;
use crate::error::{ScoutError, SkippedTicker};
use crate::models::PriceSeries;

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Daily bars for `ticker` with dates in `[start, end]`, ascending.
    /// An empty series means the ticker was not found.
    async fn fetch_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
    -> Result<PriceSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Series that came back non-empty, plus every ticker that failed or was empty.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub series: Vec<PriceSeries>,
    pub skipped: Vec<SkippedTicker>,
}

/// Fetch many tickers in batches of at most `PROVIDER.simultaneous_calls_ceiling`
/// concurrent requests. A failing ticker is recorded and the batch carries on.
/// Output keeps the order of `tickers`.
pub async fn fetch_many(
    provider: &dyn PriceHistoryProvider,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> FetchReport {
    let mut report = FetchReport::default();
    let ceiling = PROVIDER.simultaneous_calls_ceiling.max(1);

    for batch in tickers.chunks(ceiling) {
        #[cfg(debug_assertions)]
        let start_tasks_time = DEBUG_FLAGS.print_provider.then(Instant::now);
        let results = join_all(
            batch
                .iter()
                .map(|ticker| provider.fetch_history(ticker, start, end)),
        )
        .await;

        #[cfg(debug_assertions)]
        if let Some(began) = start_tasks_time {
            log::info!(
                "{}: batch of {} fetched in {:?}",
                provider.signature(),
                batch.len(),
                began.elapsed()
            );
        }

        for (ticker, result) in batch.iter().zip(results) {
            match result {
                Ok(series) if series.is_empty() => {
                    log::warn!("No data for {} between {} and {}", ticker, start, end);
                    report
                        .skipped
                        .push(SkippedTicker::new(ticker.clone(), ScoutError::no_data(ticker)));
                }
                Ok(series) => report.series.push(series),
                Err(e) => {
                    log::warn!("{} failed for {}: {:#}", provider.signature(), ticker, e);
                    let error = ScoutError::Provider {
                        ticker: ticker.clone(),
                        reason: format!("{:#}", e),
                    };
                    report.skipped.push(SkippedTicker::new(ticker.clone(), error));
                }
            }
        }
    }

    report
}
