//! File persistence and serialization configuration

use std::path::PathBuf;

pub struct StoreConfig {
    /// Directory holding the historical price store
    pub directory: &'static str,
    /// Base filename for the store (without version or extension)
    pub filename_without_ext: &'static str,
    /// Current version of the store serialization format
    pub version: f64,
}

pub struct TableConfig {
    /// Historical core signal table, keyed by (date, ticker)
    pub core_signals: &'static str,
    /// Ripple backtest event table, keyed by (core_date, core_ticker, neighbor)
    pub ripple_results: &'static str,
}

pub struct PersistenceConfig {
    /// Knowledge graph (core ticker -> neighbors) config file
    pub graph_path: &'static str,
    pub store: StoreConfig,
    pub tables: TableConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    graph_path: "config/neighbors.json",
    store: StoreConfig {
        directory: "data",
        filename_without_ext: "historical",
        version: 1.0,
    },
    tables: TableConfig {
        core_signals: "data/core_signals.csv",
        ripple_results: "data/ripple_backtest_results.csv",
    },
};

/// Versioned store filename
/// Example: "historical_v1.bin"
pub fn historical_store_filename() -> String {
    format!(
        "{}_v{}.bin",
        PERSISTENCE.store.filename_without_ext, PERSISTENCE.store.version
    )
}

pub fn historical_store_path() -> PathBuf {
    PathBuf::from(PERSISTENCE.store.directory).join(historical_store_filename())
}
