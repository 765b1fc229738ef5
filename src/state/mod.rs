//! State management module
//!
//! Shared, lock-protected application state handed to the HTTP handlers and
//! the ticker task.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
