use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::price_bar::PriceBar;

/// A bar plus its trailing indicators. A field is `None` until its window
/// has enough history behind it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub bar: PriceBar,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub vol_sma10: Option<f64>,
    pub rsi14: Option<f64>,
    pub std_dev10: Option<f64>,
    /// `std_dev10 / close` of this same bar
    pub tightness: Option<f64>,
}

impl IndicatorRow {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }
}
