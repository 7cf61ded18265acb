//! VCP and Spark classification of a single indicator row.
//!
//! Comparisons are strict, and a rule whose indicator is still undefined
//! evaluates to false.

use crate::config::ScreenConfig;
use crate::models::{IndicatorRow, PatternVerdict, SparkVerdict, VcpVerdict};

/// Uptrend (close above the 200-bar average) with tight recent closes.
pub fn detect_vcp(row: &IndicatorRow, config: &ScreenConfig) -> VcpVerdict {
    let uptrend = matches!(row.sma200, Some(sma) if row.close() > sma);
    let tight = matches!(row.tightness, Some(t) if t < config.tightness_threshold);

    VcpVerdict {
        is_vcp: uptrend && tight,
        tightness: row.tightness,
    }
}

/// Momentum, a volume spike and a close above the 50-bar average, all at once.
pub fn detect_spark(row: &IndicatorRow, config: &ScreenConfig) -> SparkVerdict {
    let momentum = matches!(row.rsi14, Some(rsi) if rsi > config.rsi_momentum_floor);
    let volume_spike = matches!(
        row.vol_sma10,
        Some(avg) if row.bar.volume > config.volume_spike_multiplier * avg
    );
    let breakout = matches!(row.sma50, Some(sma) if row.close() > sma);

    SparkVerdict {
        is_spark: momentum && volume_spike && breakout,
        rsi: row.rsi14,
        vol_ratio: row
            .vol_sma10
            .filter(|avg| *avg > 0.0)
            .map(|avg| row.bar.volume / avg),
    }
}

pub fn evaluate(row: &IndicatorRow, config: &ScreenConfig) -> PatternVerdict {
    PatternVerdict::from_parts(detect_vcp(row, config), detect_spark(row, config))
}

/// Every row judged independently, as if it were "today".
pub fn evaluate_all(rows: &[IndicatorRow], config: &ScreenConfig) -> Vec<PatternVerdict> {
    rows.iter().map(|row| evaluate(row, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::indicators::compute_indicators;
    use crate::domain::PriceBar;
    use crate::test_support::*;

    /// A row where both patterns fire; tests knock out one field at a time.
    fn firing_row() -> IndicatorRow {
        IndicatorRow {
            bar: PriceBar::new(day(0), 109.0, 110.5, 108.5, 110.0, 3_000.0),
            sma50: Some(105.0),
            sma200: Some(100.0),
            vol_sma10: Some(1_000.0),
            rsi14: Some(60.0),
            std_dev10: Some(1.1),
            tightness: Some(0.01),
        }
    }

    fn last_verdict(closes: &[f64], volumes: &[f64]) -> PatternVerdict {
        let series = series_from("SYN", closes, volumes);
        let rows = compute_indicators(&series);
        evaluate(rows.last().unwrap(), &ScreenConfig::default())
    }

    #[test]
    fn firing_row_fires_both() {
        let verdict = evaluate(&firing_row(), &ScreenConfig::default());
        assert!(verdict.is_vcp && verdict.is_spark);
        assert_eq!(verdict.vol_ratio, Some(3.0));
    }

    #[test]
    fn undefined_indicators_never_fire() {
        let config = ScreenConfig::default();

        let row = IndicatorRow { sma200: None, ..firing_row() };
        assert!(!detect_vcp(&row, &config).is_vcp);
        let row = IndicatorRow { tightness: None, ..firing_row() };
        assert!(!detect_vcp(&row, &config).is_vcp);

        let row = IndicatorRow { rsi14: None, ..firing_row() };
        assert!(!detect_spark(&row, &config).is_spark);
        let row = IndicatorRow { sma50: None, ..firing_row() };
        assert!(!detect_spark(&row, &config).is_spark);
        let row = IndicatorRow { vol_sma10: None, ..firing_row() };
        let spark = detect_spark(&row, &config);
        assert!(!spark.is_spark);
        assert_eq!(spark.vol_ratio, None);
    }

    #[test]
    fn thresholds_are_strict() {
        let config = ScreenConfig::default();

        let row = IndicatorRow { tightness: Some(0.035), ..firing_row() };
        assert!(!detect_vcp(&row, &config).is_vcp);
        let row = IndicatorRow { sma200: Some(110.0), ..firing_row() };
        assert!(!detect_vcp(&row, &config).is_vcp);

        let row = IndicatorRow { rsi14: Some(50.0), ..firing_row() };
        assert!(!detect_spark(&row, &config).is_spark);
        let row = IndicatorRow { vol_sma10: Some(2_000.0), ..firing_row() };
        assert!(!detect_spark(&row, &config).is_spark);
        let row = IndicatorRow { sma50: Some(110.0), ..firing_row() };
        assert!(!detect_spark(&row, &config).is_spark);
    }

    #[test]
    fn thresholds_come_from_config() {
        let row = IndicatorRow { tightness: Some(0.02), rsi14: Some(55.0), ..firing_row() };
        let strict = ScreenConfig {
            tightness_threshold: 0.015,
            volume_spike_multiplier: 4.0,
            rsi_momentum_floor: 60.0,
        };
        let verdict = evaluate(&row, &strict);
        assert!(!verdict.is_vcp && !verdict.is_spark);
        assert!(evaluate(&row, &ScreenConfig::default()).fired());
    }

    #[test]
    fn vcp_and_spark_fire_together() {
        let verdict = last_verdict(&contraction_closes(), &spike_volumes(210));
        assert!(verdict.is_vcp);
        assert!(verdict.is_spark);
        assert!(verdict.fired());
    }

    #[test]
    fn vcp_fires_alone() {
        let verdict = last_verdict(&contraction_closes(), &flat_volumes(210));
        assert!(verdict.is_vcp);
        assert!(!verdict.is_spark);
        assert!(verdict.fired());
    }

    #[test]
    fn spark_fires_alone() {
        let verdict = last_verdict(&breakout_closes(), &spike_volumes(210));
        assert!(!verdict.is_vcp);
        assert!(verdict.tightness.unwrap() > 0.035);
        assert!(verdict.is_spark);
        assert!(verdict.fired());
    }

    #[test]
    fn neither_fires_on_a_decline() {
        let verdict = last_verdict(&decline_closes(), &spike_volumes(210));
        assert!(!verdict.is_vcp);
        assert!(!verdict.is_spark);
        assert!(!verdict.fired());
        assert_eq!(verdict.rsi, Some(0.0));
    }

    #[test]
    fn flat_stretch_above_average_counts_as_full_momentum() {
        // Fourteen unchanged closes: no gains and no losses, so RSI is 100
        let closes = flat_then(&[110.0; 20]);
        let verdict = last_verdict(&closes, &spike_volumes(220));
        assert_eq!(verdict.rsi, Some(100.0));
        assert!(verdict.is_spark);
    }
}
