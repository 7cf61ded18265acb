use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::price_bar::PriceBar;

// ============================================================================
// PriceSeries: Raw daily OHLCV history for one ticker
// ============================================================================

/// Column-oriented daily history. Dates are strictly increasing and every
/// column has the same length.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub dates: Vec<NaiveDate>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    // Volumes
    pub volumes: Vec<f64>,
}

impl PriceSeries {
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Builds a series from bars in any order. Bars with non-finite values
    /// are skipped and, for a repeated date, the first bar wins.
    pub fn from_bars(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        let ticker = ticker.into();
        let before = bars.len();
        bars.retain(PriceBar::is_complete);
        // Stable sort keeps the first occurrence of a duplicate date in front
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        if bars.len() != before {
            log::warn!(
                "{}: dropped {} incomplete or duplicate bars",
                ticker,
                before - bars.len()
            );
        }

        let mut series = Self::empty(ticker);
        for bar in bars {
            series.dates.push(bar.date);
            series.open_prices.push(bar.open);
            series.high_prices.push(bar.high);
            series.low_prices.push(bar.low);
            series.close_prices.push(bar.close);
            series.volumes.push(bar.volume);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn bar(&self, idx: usize) -> PriceBar {
        PriceBar::new(
            self.dates[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn bars(&self) -> impl Iterator<Item = PriceBar> + '_ {
        (0..self.len()).map(|idx| self.bar(idx))
    }

    /// Exact-date lookup.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Bars with `start <= date <= end`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let start_idx = self.dates.partition_point(|d| *d < start);
        let end_idx = self.dates.partition_point(|d| *d <= end);
        if start_idx >= end_idx {
            return Self::empty(self.ticker.clone());
        }
        let range = start_idx..end_idx;
        PriceSeries {
            ticker: self.ticker.clone(),
            dates: self.dates[range.clone()].to_vec(),
            open_prices: self.open_prices[range.clone()].to_vec(),
            high_prices: self.high_prices[range.clone()].to_vec(),
            low_prices: self.low_prices[range.clone()].to_vec(),
            close_prices: self.close_prices[range.clone()].to_vec(),
            volumes: self.volumes[range].to_vec(),
        }
    }
}

// ============================================================================
// SeriesCollection: every ticker's history for one run
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct SeriesCollection {
    pub name: String, // Metadata e.g. "Daily History Collection".
    pub series_data: Vec<PriceSeries>,
}

impl SeriesCollection {
    pub fn new(name: impl Into<String>, series_data: Vec<PriceSeries>) -> Self {
        Self {
            name: name.into(),
            series_data,
        }
    }

    pub fn find(&self, ticker: &str) -> Option<&PriceSeries> {
        self.series_data.iter().find(|s| s.ticker == ticker)
    }

    pub fn tickers(&self) -> Vec<String> {
        self.series_data.iter().map(|s| s.ticker.clone()).collect()
    }
}
