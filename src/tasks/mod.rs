//! Ticker task driving the focus countdown, one per run generation

pub mod ticker;

// Re-export main functions
pub use ticker::ticker_task;
