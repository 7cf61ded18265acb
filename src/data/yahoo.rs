// Daily bars from the public Yahoo chart endpoint

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::{Duration, sleep};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::PROVIDER;
use crate::config::provider::ProviderConfig;
use crate::data::provider::PriceHistoryProvider;
use crate::domain::PriceBar;
use crate::models::PriceSeries;
use crate::utils::time_utils::{date_to_epoch_sec, epoch_sec_to_date};

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

// Columns may contain nulls on halted or partial days
#[derive(Deserialize, Debug, Default)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], idx: usize) -> Option<f64> {
    values.get(idx).copied().flatten()
}

/// Convert a decoded chart payload into bars within `[start, end]`.
/// Rows with any missing field are dropped.
pub fn bars_from_chart(response: ChartResponse, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
    if let Some(err) = response.chart.error {
        if err.code == "Not Found" {
            return Ok(Vec::new());
        }
        bail!("Chart error {}: {}", err.code, err.description);
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(idx, ts)| {
            let date = epoch_sec_to_date(*ts)?;
            Some(PriceBar::new(
                date,
                column(&quote.open, idx)?,
                column(&quote.high, idx)?,
                column(&quote.low, idx)?,
                column(&quote.close, idx)?,
                column(&quote.volume, idx)?,
            ))
        })
        .filter(|bar| bar.date >= start && bar.date <= end)
        .collect();
    Ok(bars)
}

pub struct YahooChartProvider {
    client: Client,
    config: ProviderConfig,
}

impl YahooChartProvider {
    pub fn new() -> Result<Self> {
        Self::with_config(PROVIDER)
    }

    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.endpoint.user_agent)
            .timeout(Duration::from_millis(config.client.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/{}", self.config.endpoint.base_url, ticker)
    }

    async fn request_once(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Option<ChartResponse>> {
        // period2 is exclusive, so ask for the day after `end`
        let period1 = date_to_epoch_sec(start);
        let period2 = date_to_epoch_sec(end + ChronoDuration::days(1));

        let response = self
            .client
            .get(self.chart_url(ticker))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", self.config.endpoint.interval.to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Request for {} failed", ticker))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("Bad status for {}", ticker))?;
        let body = response
            .json::<ChartResponse>()
            .await
            .with_context(|| format!("Failed to decode chart for {}", ticker))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooChartProvider {
    fn signature(&self) -> &'static str {
        "Yahoo Chart API"
    }

    async fn fetch_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let mut attempt = 0;
        let body = loop {
            match self.request_once(ticker, start, end).await {
                Ok(body) => break body,
                Err(e) if attempt < self.config.client.retries => {
                    attempt += 1;
                    log::warn!("{} (attempt {}): {:#}", ticker, attempt, e);
                    sleep(Duration::from_millis(self.config.client.backoff_ms * attempt as u64)).await;
                }
                Err(e) => return Err(e),
            }
        };

        let Some(body) = body else {
            return Ok(PriceSeries::empty(ticker));
        };
        let bars = bars_from_chart(body, start, end)?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_provider {
            log::info!("{}: {} daily bars from {} to {}", ticker, bars.len(), start, end);
        }

        Ok(PriceSeries::from_bars(ticker, bars))
    }
}
