//! Focus session timer
//!
//! The in-process core: preset table, countdown engine, phase sequencing,
//! session history and the stats derived from it.

pub mod engine;
pub mod focus;
pub mod history;
pub mod phase;
pub mod preset;
pub mod stats;

// Re-export main types
pub use engine::{format_clock, DisplayState, PhaseCompleted, TimerEngine, TimerStatus};
pub use focus::{FocusOptions, FocusTimer};
pub use history::{SessionRecord, SessionRecorder, RECENT_SESSIONS};
pub use phase::{next_phase, Phase, Sequenced, SessionKind, LONG_BREAK_EVERY};
pub use preset::{Preset, PresetDurations};
pub use stats::{today_stats, TodayStats};
