use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{PERSISTENCE, PROVIDER};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::provider::{FetchReport, PriceHistoryProvider, fetch_many};
use crate::error::SkippedTicker;
use crate::models::{KnowledgeGraph, PriceSeries, SeriesCollection};
use crate::utils::time_utils::how_many_seconds_ago;

/// Versioned on-disk snapshot of every downloaded series.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoricalStore {
    pub version: f64,
    pub timestamp_ms: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub data: SeriesCollection,
}

impl HistoricalStore {
    pub fn new(data: SeriesCollection, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            version: PERSISTENCE.store.version,
            timestamp_ms: Utc::now().timestamp_millis(),
            start,
            end,
            data,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open historical store: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let store: Self = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize historical store: {:?}", path))?;

        if store.version != PERSISTENCE.store.version {
            bail!(
                "Historical store version mismatch: file v{} vs required v{}",
                store.version,
                PERSISTENCE.store.version
            );
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_serde {
            log::info!(
                "Historical store loaded: {} series, {}s old",
                store.data.series_data.len(),
                how_many_seconds_ago(store.timestamp_ms)
            );
        }
        Ok(store)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize historical store to: {}", path.display()))
    }

    pub fn age_secs(&self) -> i64 {
        how_many_seconds_ago(self.timestamp_ms)
    }
}

/// Serves date windows out of an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct StoreProvider {
    data: Arc<SeriesCollection>,
}

impl StoreProvider {
    pub fn new(data: SeriesCollection) -> Self {
        Self { data: Arc::new(data) }
    }
}

#[async_trait]
impl PriceHistoryProvider for StoreProvider {
    fn signature(&self) -> &'static str {
        "Local Store"
    }

    async fn fetch_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        Ok(self
            .data
            .find(ticker)
            .map(|series| series.window(start, end))
            .unwrap_or_else(|| PriceSeries::empty(ticker)))
    }
}

/// Everything the `download` command produced.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub store: HistoricalStore,
    pub skipped: Vec<SkippedTicker>,
}

/// Fetch every core and neighbor ticker over the backtest span plus the
/// indicator warm-up buffer, ending at `end`.
pub async fn download_history(
    provider: &dyn PriceHistoryProvider,
    graph: &KnowledgeGraph,
    end: NaiveDate,
) -> DownloadReport {
    let windows = &PROVIDER.windows;
    let start = end - Duration::days(windows.backtest_span_days + windows.warmup_buffer_days);
    let tickers = graph.all_tickers();

    log::info!(
        "Downloading {} tickers from {} to {} via {}",
        tickers.len(),
        start,
        end,
        provider.signature()
    );
    let FetchReport { series, skipped } = fetch_many(provider, &tickers, start, end).await;
    log::info!("Downloaded {}/{} tickers", series.len(), tickers.len());

    DownloadReport {
        store: HistoricalStore::new(
            SeriesCollection::new("Daily History Collection", series),
            start,
            end,
        ),
        skipped,
    }
}
