// Price history providers, the local store and result tables
pub mod provider;
pub mod store;
pub mod tables;
pub mod yahoo;

// Re-export commonly used types
pub use provider::{FetchReport, PriceHistoryProvider, fetch_many};
pub use store::{DownloadReport, HistoricalStore, StoreProvider, download_history};
pub use yahoo::YahooChartProvider;
