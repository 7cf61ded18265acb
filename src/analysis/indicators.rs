//! Trailing technical features over an ordered daily series.
//!
//! Every helper returns one value per input bar, `None` until its window is
//! full. Nothing here mutates the input series.

use crate::config::SCREEN;
use crate::models::{IndicatorRow, PriceSeries};
use crate::utils::maths_utils;

/// Compute every indicator column and zip them back onto the bars.
/// Same length and date order as `series`; an empty series gives an empty vec.
pub fn compute_indicators(series: &PriceSeries) -> Vec<IndicatorRow> {
    let windows = &SCREEN.windows;
    let closes = &series.close_prices;

    let sma50 = rolling_mean(closes, windows.sma_fast);
    let sma200 = rolling_mean(closes, windows.sma_slow);
    let vol_sma10 = rolling_mean(&series.volumes, windows.volume_sma);
    let rsi14 = rolling_rsi(closes, windows.rsi);
    let std_dev10 = rolling_std_dev(closes, windows.dispersion);

    (0..series.len())
        .map(|idx| {
            let close = closes[idx];
            IndicatorRow {
                bar: series.bar(idx),
                sma50: sma50[idx],
                sma200: sma200[idx],
                vol_sma10: vol_sma10[idx],
                rsi14: rsi14[idx],
                std_dev10: std_dev10[idx],
                // Both terms are known at this bar's close
                tightness: std_dev10[idx]
                    .filter(|_| close > 0.0)
                    .map(|std_dev| std_dev / close),
            }
        })
        .collect()
}

/// Trailing simple mean over `window` values, inclusive of the current one.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let start_idx = i + 1 - window;
        let sum: f64 = values[start_idx..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Trailing sample (N-1) standard deviation, inclusive of the current value.
pub fn rolling_std_dev(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        out[i] = maths_utils::sample_std_dev(&values[i + 1 - window..=i]);
    }
    out
}

/// RSI from simple (not exponential) rolling means of up and down moves.
///
/// The first bar has no previous close and counts as a zero move, so the
/// value is defined from bar `window - 1` onwards.
pub fn rolling_rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let delta = |i: usize| if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
    let gains: Vec<f64> = (0..closes.len()).map(|i| delta(i).max(0.0)).collect();
    let losses: Vec<f64> = (0..closes.len()).map(|i| (-delta(i)).max(0.0)).collect();

    let avg_gains = rolling_mean(&gains, window);
    let avg_losses = rolling_mean(&losses, window);

    avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
        .collect()
}

/// A zero average loss means an infinite RS, reported as exactly 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn wave_closes(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + 5.0 * (i as f64 * 0.37).sin() + 0.05 * i as f64)
            .collect()
    }

    fn first_defined(
        rows: &[IndicatorRow],
        field: impl Fn(&IndicatorRow) -> Option<f64>,
    ) -> Option<usize> {
        rows.iter().position(|row| field(row).is_some())
    }

    #[test]
    fn empty_series_gives_empty_rows() {
        let series = PriceSeries::empty("NONE");
        assert!(compute_indicators(&series).is_empty());
    }

    #[test]
    fn rows_keep_length_and_dates() {
        let closes = wave_closes(60);
        let series = series_from("AAA", &closes, &flat_volumes(60));
        let rows = compute_indicators(&series);

        assert_eq!(rows.len(), series.len());
        for (row, date) in rows.iter().zip(&series.dates) {
            assert_eq!(row.date(), *date);
        }
        // Input untouched
        assert_eq!(series.close_prices, closes);
    }

    #[test]
    fn each_indicator_becomes_defined_exactly_when_its_window_fills() {
        let series = series_from("AAA", &wave_closes(250), &flat_volumes(250));
        let rows = compute_indicators(&series);

        assert_eq!(first_defined(&rows, |r| r.sma50), Some(49));
        assert_eq!(first_defined(&rows, |r| r.sma200), Some(199));
        assert_eq!(first_defined(&rows, |r| r.vol_sma10), Some(9));
        assert_eq!(first_defined(&rows, |r| r.rsi14), Some(13));
        assert_eq!(first_defined(&rows, |r| r.std_dev10), Some(9));
        assert_eq!(first_defined(&rows, |r| r.tightness), Some(9));

        // Once defined, defined for good
        assert!(rows[199..].iter().all(|r| r.sma200.is_some() && r.sma50.is_some()));
        assert!(rows[13..].iter().all(|r| r.rsi14.is_some()));
    }

    #[test]
    fn short_series_leaves_long_windows_undefined() {
        let series = series_from("AAA", &wave_closes(40), &flat_volumes(40));
        let rows = compute_indicators(&series);

        assert!(rows.iter().all(|r| r.sma50.is_none() && r.sma200.is_none()));
        assert!(rows.last().unwrap().rsi14.is_some());
    }

    #[test]
    fn rsi_is_exactly_100_when_no_down_moves() {
        // Fourteen non-negative deltas, some of them flat
        let closes: Vec<f64> = (0..14).map(|i| 50.0 + (i / 2) as f64).collect();
        let rsi = rolling_rsi(&closes, 14);

        assert_eq!(rsi[12], None);
        assert_eq!(rsi[13], Some(100.0));

        // Completely flat prices also have zero loss
        let flat = rolling_rsi(&[10.0; 20], 14);
        assert_eq!(flat[19], Some(100.0));
        assert_eq!(rsi_from_averages(0.0, 0.0), 100.0);
    }

    #[test]
    fn rsi_matches_hand_computation() {
        // Alternating +2 / -1 moves
        let mut closes = vec![100.0];
        for i in 1..15 {
            let step = if i % 2 == 1 { 2.0 } else { -1.0 };
            closes.push(closes[i - 1] + step);
        }
        let rsi = rolling_rsi(&closes, 14);

        // Window of bars 1..=14: seven +2 moves and seven -1 moves
        let expected = 100.0 - 100.0 / (1.0 + (14.0 / 14.0) / (7.0 / 14.0));
        assert!((rsi[14].unwrap() - expected).abs() < 1e-9);
        assert!((rsi[14].unwrap() - 200.0 / 3.0).abs() < 1e-9);

        // All losses gives 0
        assert_eq!(rsi_from_averages(0.0, 1.0), 0.0);
    }

    #[test]
    fn tightness_uses_the_current_close() {
        let series = series_from("AAA", &contraction_closes(), &flat_volumes(210));
        let rows = compute_indicators(&series);
        let last = rows.last().unwrap();

        assert_eq!(last.close(), 110.0);
        let expected_std = (72.105_f64 / 9.0).sqrt();
        assert!((last.std_dev10.unwrap() - expected_std).abs() < 1e-9);
        assert!((last.tightness.unwrap() - CONTRACTION_TIGHTNESS).abs() < 1e-9);
    }

    #[test]
    fn tightness_is_reproducible_across_runs() {
        let closes = wave_closes(250);
        let series = series_from("AAA", &closes, &flat_volumes(250));

        let first = compute_indicators(&series);
        let second = compute_indicators(&series);
        assert_eq!(first, second);

        // Independent two-pass computation of the last window
        let window = &closes[240..250];
        let mean = window.iter().sum::<f64>() / 10.0;
        let var = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / 9.0;
        let expected = var.sqrt() / closes[249];
        assert!((first[249].tightness.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn sma_of_flat_volume_is_the_volume() {
        let series = series_from("AAA", &contraction_closes(), &spike_volumes(210));
        let rows = compute_indicators(&series);

        assert_eq!(rows[208].vol_sma10, Some(BASE_VOLUME));
        assert_eq!(rows[209].vol_sma10, Some(1_400.0));
        assert_eq!(rows[199].sma200, Some(100.0));
    }
}
