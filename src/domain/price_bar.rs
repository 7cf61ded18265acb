use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. The date is the unique key within a series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    // A constructor for convenience
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All five values are usable numbers.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}
