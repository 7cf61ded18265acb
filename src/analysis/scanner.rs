use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{SCREEN, ScreenConfig};
use crate::error::{ScoutError, SkippedTicker};
use crate::models::{PriceSeries, SparkVerdict, VcpVerdict};

use super::indicators::compute_indicators;
use super::patterns::{detect_spark, detect_vcp};

/// As-of-latest-day verdict for one ticker.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub ticker: String,
    pub as_of_date: NaiveDate,
    pub current_price: f64,
    pub vcp: VcpVerdict,
    pub spark: SparkVerdict,
    pub actionable: bool,
}

/// Scan one ticker's history and judge its last bar.
///
/// A series shorter than the history floor is excluded with an error even
/// when the Spark rule alone would need far fewer bars.
pub fn scan(
    ticker: &str,
    series: &PriceSeries,
    config: &ScreenConfig,
) -> Result<ScanResult, ScoutError> {
    if series.is_empty() {
        return Err(ScoutError::no_data(ticker));
    }
    let required = SCREEN.scan.min_history_bars;
    if series.len() < required {
        return Err(ScoutError::InsufficientHistory {
            ticker: ticker.to_string(),
            bars: series.len(),
            required,
        });
    }

    let rows = compute_indicators(series);
    let last = rows.last().ok_or_else(|| ScoutError::no_data(ticker))?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_indicators {
        log::info!("{} indicators as of {}: {:?}", ticker, last.date(), last);
    }

    let vcp = detect_vcp(last, config);
    let spark = detect_spark(last, config);

    Ok(ScanResult {
        ticker: ticker.to_string(),
        as_of_date: last.date(),
        current_price: last.close(),
        actionable: vcp.is_vcp || spark.is_spark,
        vcp,
        spark,
    })
}

/// Results of scanning a batch, with the tickers that were excluded.
#[derive(Debug, Clone, Default)]
pub struct ScanBatch {
    pub results: Vec<ScanResult>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanBatch {
    pub fn actionable(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.actionable)
    }
}

/// Scan every series in parallel. Output keeps the order of `series`.
pub fn scan_all(series: &[PriceSeries], config: &ScreenConfig) -> ScanBatch {
    let outcomes: Vec<Result<ScanResult, ScoutError>> = series
        .par_iter()
        .map(|s| scan(&s.ticker, s, config))
        .collect();

    let mut batch = ScanBatch::default();
    for (s, outcome) in series.iter().zip(outcomes) {
        match outcome {
            Ok(result) => batch.results.push(result),
            Err(e) => {
                log::warn!("Skipping {}: {}", s.ticker, e);
                batch.skipped.push(SkippedTicker::new(s.ticker.clone(), e));
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn scan_synthetic(closes: &[f64], volumes: &[f64]) -> ScanResult {
        let series = series_from("SYN", closes, volumes);
        scan("SYN", &series, &ScreenConfig::default()).unwrap()
    }

    #[test]
    fn actionable_is_vcp_or_spark_over_all_combinations() {
        let cases = [
            (contraction_closes(), spike_volumes(210), true, true),
            (contraction_closes(), flat_volumes(210), true, false),
            (breakout_closes(), spike_volumes(210), false, true),
            (decline_closes(), spike_volumes(210), false, false),
        ];

        for (closes, volumes, vcp, spark) in cases {
            let result = scan_synthetic(&closes, &volumes);
            assert_eq!(result.vcp.is_vcp, vcp);
            assert_eq!(result.spark.is_spark, spark);
            assert_eq!(result.actionable, vcp || spark);
        }
    }

    #[test]
    fn history_floor_excludes_even_when_spark_fires() {
        // 199 bars ending in a spark-shaped breakout
        let closes = breakout_closes()[11..].to_vec();
        let volumes = spike_volumes(closes.len());
        assert_eq!(closes.len(), 199);
        let series = series_from("SHORT", &closes, &volumes);

        let rows = compute_indicators(&series);
        let last = rows.last().unwrap();
        assert!(detect_spark(last, &ScreenConfig::default()).is_spark);

        let err = scan("SHORT", &series, &ScreenConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScoutError::InsufficientHistory {
                ticker: "SHORT".to_string(),
                bars: 199,
                required: 200,
            }
        );
    }

    #[test]
    fn empty_series_is_data_unavailable() {
        let err = scan("NONE", &PriceSeries::empty("NONE"), &ScreenConfig::default()).unwrap_err();
        assert!(matches!(err, ScoutError::DataUnavailable { .. }));
    }

    #[test]
    fn contraction_after_flat_base_is_vcp_without_spark() {
        let result = scan_synthetic(&contraction_closes(), &flat_volumes(210));

        assert_eq!(result.as_of_date, day(209));
        assert_eq!(result.current_price, 110.0);
        assert!(result.vcp.is_vcp);
        assert!(!result.spark.is_spark);
        assert!((result.vcp.tightness.unwrap() - CONTRACTION_TIGHTNESS).abs() < 1e-9);
        assert_eq!(result.spark.vol_ratio, Some(1.0));
    }

    #[test]
    fn batch_keeps_order_and_reports_skips() {
        let series = vec![
            series_from("AAA", &contraction_closes(), &flat_volumes(210)),
            series_from("BBB", &[100.0; 20], &flat_volumes(20)),
            PriceSeries::empty("CCC"),
            series_from("DDD", &decline_closes(), &flat_volumes(210)),
        ];
        let batch = scan_all(&series, &ScreenConfig::default());

        let tickers: Vec<&str> = batch.results.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA", "DDD"]);
        let skipped: Vec<&str> = batch.skipped.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(skipped, vec!["BBB", "CCC"]);
        assert_eq!(batch.actionable().count(), 1);
    }
}
