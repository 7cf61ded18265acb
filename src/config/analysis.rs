//! Screening and backtest configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Trailing window lengths (in bars) used by the indicator engine
pub struct IndicatorWindows {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub volume_sma: usize,
    pub rsi: usize,
    // Close-to-close dispersion window used for tightness
    pub dispersion: usize,
}

/// Default pattern thresholds (overridable at runtime through `ScreenConfig`)
pub struct PatternThresholds {
    // VCP fires when stdDev10 / close is strictly below this
    pub tightness_threshold: f64,
    // Spark needs volume strictly above this multiple of the 10-bar volume average
    pub volume_spike_multiplier: f64,
    // Spark needs RSI strictly above this
    pub rsi_momentum_floor: f64,
}

/// Settings for the per-ticker live scanner
pub struct ScanSettings {
    // Hard floor applied to every ticker, whichever pattern is being tested
    pub min_history_bars: usize,
}

/// Settings for the ripple backtest
pub struct BacktestSettings {
    // Forward horizons (in trading bars) for the close-based returns
    pub horizons: [usize; 3],
    // Forward bars required after the signal date. Also the High-based max-return window.
    pub max_horizon: usize,
    // Bars after the signal date in which the neighbor's own signal is looked for
    pub reaction_window: usize,
    // Minimum events for a (core, neighbor) pair to appear in pair statistics
    pub min_pair_events: usize,
}

/// The Master Screen Configuration
pub struct ScreenDefaults {
    pub windows: IndicatorWindows,
    pub thresholds: PatternThresholds,
    pub scan: ScanSettings,
    pub backtest: BacktestSettings,
}

pub const SCREEN: ScreenDefaults = ScreenDefaults {
    windows: IndicatorWindows {
        sma_fast: 50,
        sma_slow: 200,
        volume_sma: 10,
        rsi: 14,
        dispersion: 10,
    },

    thresholds: PatternThresholds {
        tightness_threshold: 0.035,
        volume_spike_multiplier: 1.5,
        rsi_momentum_floor: 50.0,
    },

    scan: ScanSettings {
        min_history_bars: 200,
    },

    backtest: BacktestSettings {
        horizons: [5, 10, 20],
        max_horizon: 20,
        reaction_window: 5,
        min_pair_events: 10,
    },
};

/// Runtime pattern thresholds handed to every engine entry point.
///
/// Built once (defaults, or a JSON file) and never mutated afterwards, so a
/// single instance can be shared freely across rayon workers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenConfig {
    pub tightness_threshold: f64,
    pub volume_spike_multiplier: f64,
    pub rsi_momentum_floor: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tightness_threshold: SCREEN.thresholds.tightness_threshold,
            volume_spike_multiplier: SCREEN.thresholds.volume_spike_multiplier,
            rsi_momentum_floor: SCREEN.thresholds.rsi_momentum_floor,
        }
    }
}

impl ScreenConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse screen thresholds")
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read thresholds file: {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Loads thresholds from `path` if given. A broken file degrades to the
    /// defaults with a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            None => Self::default(),
            Some(path) => Self::load_from_path(path).unwrap_or_else(|e| {
                log::warn!("⚠️  {:#}. Using default thresholds.", e);
                Self::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_screen_constants() {
        let config = ScreenConfig::default();
        assert_eq!(config.tightness_threshold, 0.035);
        assert_eq!(config.volume_spike_multiplier, 1.5);
        assert_eq!(config.rsi_momentum_floor, 50.0);
    }

    #[test]
    fn partial_json_falls_back_per_option() {
        let config = ScreenConfig::from_json_str(r#"{"tightnessThreshold": 0.02}"#).unwrap();
        assert_eq!(config.tightness_threshold, 0.02);
        assert_eq!(config.volume_spike_multiplier, 1.5);
        assert_eq!(config.rsi_momentum_floor, 50.0);
    }

    #[test]
    fn missing_file_degrades_to_defaults() {
        let path = Path::new("definitely/not/here/thresholds.json");
        assert_eq!(ScreenConfig::load_or_default(Some(path)), ScreenConfig::default());
    }
}
