//! Configuration module for the ripple scout application.

pub mod analysis;

mod debug; // Private: use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod provider;

// Re-export commonly used items
pub use analysis::{SCREEN, ScreenConfig, ScreenDefaults};
pub use persistence::{PERSISTENCE, historical_store_filename, historical_store_path};
pub use provider::PROVIDER;
