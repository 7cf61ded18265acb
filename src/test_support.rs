//! Synthetic series builders shared by unit tests.

use chrono::{Duration, NaiveDate};

use crate::domain::PriceBar;
use crate::models::PriceSeries;

/// Last ten closes of the contraction scenario: +10 over ten bars with
/// shrinking steps (1.9, 1.7, ... 0.1).
pub const CONTRACTION_CLOSES: [f64; 10] = [
    101.9, 103.6, 105.1, 106.4, 107.5, 108.4, 109.1, 109.6, 109.9, 110.0,
];

/// Sample std dev of `CONTRACTION_CLOSES` divided by the last close:
/// squared deviations from 107.15 sum to 72.105, so sqrt(72.105 / 9) / 110.
pub const CONTRACTION_TIGHTNESS: f64 = 0.025_731_716_074_160_54;

pub const BASE_VOLUME: f64 = 1_000.0;

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Duration::days(offset)
}

/// One bar per calendar day starting at `day(0)`. High/low sit half a point
/// around the close, so High >= Close on every bar.
pub fn series_from(ticker: &str, closes: &[f64], volumes: &[f64]) -> PriceSeries {
    assert_eq!(closes.len(), volumes.len());
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            PriceBar::new(day(i as i64), close, close + 0.5, close - 0.5, close, volume)
        })
        .collect();
    PriceSeries::from_bars(ticker, bars)
}

/// 200 bars flat at 100, followed by `tail`.
pub fn flat_then(tail: &[f64]) -> Vec<f64> {
    let mut closes = vec![100.0; 200];
    closes.extend_from_slice(tail);
    closes
}

pub fn contraction_closes() -> Vec<f64> {
    flat_then(&CONTRACTION_CLOSES)
}

/// Steep run-up (+3 per bar); far too loose for VCP.
pub fn breakout_closes() -> Vec<f64> {
    let tail: Vec<f64> = (1..=10).map(|k| 100.0 + 3.0 * k as f64).collect();
    flat_then(&tail)
}

/// Slide from 99 to 90; below every average.
pub fn decline_closes() -> Vec<f64> {
    let tail: Vec<f64> = (1..=10).map(|k| 100.0 - k as f64).collect();
    flat_then(&tail)
}

pub fn flat_volumes(len: usize) -> Vec<f64> {
    vec![BASE_VOLUME; len]
}

/// Flat volume with a 5x spike on the last bar.
pub fn spike_volumes(len: usize) -> Vec<f64> {
    let mut volumes = flat_volumes(len);
    if let Some(last) = volumes.last_mut() {
        *last = 5.0 * BASE_VOLUME;
    }
    volumes
}
