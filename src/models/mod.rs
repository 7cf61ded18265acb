pub mod graph;
pub mod indicators;
pub mod timeseries;
pub mod verdict;

// Re-export commonly used types
pub use graph::{KnowledgeGraph, KnowledgeGraphNode};
pub use indicators::IndicatorRow;
pub use timeseries::{PriceSeries, SeriesCollection};
pub use verdict::{PatternVerdict, SparkVerdict, VcpVerdict};
