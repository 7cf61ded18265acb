use thiserror::Error as ThisError;

/// Reasons a unit of work (a ticker, or a core-event/neighbor pair) is skipped.
///
/// None of these abort a run: the batch records them and moves on. An
/// indicator whose window is not yet satisfied is not an error at all, it is
/// `None` on the corresponding `IndicatorRow` field.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ScoutError {
    #[error("No price history for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("Insufficient history for {ticker}: {bars} bars, {required} required")]
    InsufficientHistory {
        ticker: String,
        bars: usize,
        required: usize,
    },

    #[error("Knowledge graph unavailable at {path}: {reason}")]
    ConfigMissing { path: String, reason: String },

    #[error("Provider failed for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },
}

impl ScoutError {
    pub fn no_data(ticker: &str) -> Self {
        ScoutError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: "empty series".to_string(),
        }
    }
}

/// A ticker excluded from a batch, with the reason it was excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub error: ScoutError,
}

impl SkippedTicker {
    pub fn new(ticker: impl Into<String>, error: ScoutError) -> Self {
        Self {
            ticker: ticker.into(),
            error,
        }
    }
}

impl std::fmt::Display for SkippedTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.ticker, self.error)
    }
}
