// Historical core signals and their lagged effect on neighbors
pub mod correlator;
pub mod signals;
pub mod summary;

pub use correlator::{BacktestReport, PreparedSeries, RippleOutcome, correlate, run_backtest};
pub use signals::{CoreSignalEvent, SignalReport, generate_core_signals};
pub use summary::{BacktestSummary, PairStats, pair_stats, summarize, top_pairs};
