// Domain types and value objects
pub mod price_bar;
pub mod signal;

// Re-export commonly used types
pub use price_bar::PriceBar;
pub use signal::SignalLabel;
