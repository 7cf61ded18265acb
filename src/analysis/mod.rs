// Indicator engine, pattern detection and the live screening pipeline
pub mod indicators;
pub mod live_scan;
pub mod patterns;
pub mod ripple;
pub mod scanner;

// Re-export commonly used types
pub use indicators::compute_indicators;
pub use live_scan::{LiveScanReport, RippleOpportunity, ScanState, live_scan};
pub use patterns::{detect_spark, detect_vcp, evaluate};
pub use ripple::{RippleCandidates, propagate};
pub use scanner::{ScanBatch, ScanResult, scan, scan_all};
