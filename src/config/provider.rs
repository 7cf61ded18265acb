//! Market-data provider configuration constants and types.

/// Daily chart endpoint of the public market-data API
pub struct ChartEndpoint {
    /// Base URL; the ticker is appended as a path segment
    pub base_url: &'static str,
    pub interval: &'static str,
    /// The endpoint rejects requests without a browser-like user agent
    pub user_agent: &'static str,
}

/// Default values for the HTTP client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

/// Calendar spans used when requesting history
pub struct HistoryWindows {
    /// Live scan lookback ending at the target date (inclusive)
    pub live_lookback_days: i64,
    /// Backtest span ending today
    pub backtest_span_days: i64,
    /// Extra history so the 200-bar average is defined at the start of the backtest span
    pub warmup_buffer_days: i64,
}

/// The Master Provider Configuration
pub struct ProviderConfig {
    pub endpoint: ChartEndpoint,
    pub client: ClientDefaults,
    pub windows: HistoryWindows,
    /// Maximum number of simultaneous requests per batch
    pub simultaneous_calls_ceiling: usize,
}

pub const PROVIDER: ProviderConfig = ProviderConfig {
    endpoint: ChartEndpoint {
        base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
        interval: "1d",
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) ripple-scout",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        retries: 3,
        backoff_ms: 2_000,
    },
    windows: HistoryWindows {
        live_lookback_days: 365,
        backtest_span_days: 2 * 365,
        warmup_buffer_days: 300,
    },
    simultaneous_calls_ceiling: 8,
};
