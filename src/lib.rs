//! Focus Clock - A Pomodoro focus timer with session history
//!
//! This library provides the focus session core (presets, countdown engine,
//! phase sequencing, session history and daily stats) together with the
//! ticker task and HTTP API that drive it.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use timer::{FocusOptions, FocusTimer};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
