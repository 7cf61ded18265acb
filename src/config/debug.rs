//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every flag is further gated by `cfg(debug_assertions)`
//! at the call site.

pub struct DebugFlags {
    /// Emit the last indicator row of every scanned ticker.
    pub print_indicators: bool,
    /// Emit candidate -> nominating core tickers after ripple propagation.
    pub print_ripple_sources: bool,
    /// Emit every (core event, neighbor) pair dropped by the correlator and why.
    pub print_pair_drops: bool,
    /// Emit per-request provider diagnostics (urls, bar counts, timings).
    pub print_provider: bool,
    /// Emit historical store read/write timings.
    pub print_serde: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_indicators: false,
    print_ripple_sources: false,
    print_pair_drops: false,
    print_provider: false,
    print_serde: false,
};
