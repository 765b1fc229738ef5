//! Process plumbing: shutdown on SIGINT/SIGTERM

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
