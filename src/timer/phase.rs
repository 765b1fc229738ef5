//! Phase kinds and the phase sequencer

use serde::{Deserialize, Serialize};

/// Every fourth completed focus phase earns a long break
pub const LONG_BREAK_EVERY: u32 = 4;

/// The phase the countdown is currently measuring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Phase kind as kept in the session history; both breaks collapse to `Break`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Focus, Phase::ShortBreak, Phase::LongBreak];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus Time",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn kind(self) -> SessionKind {
        match self {
            Phase::Focus => SessionKind::Focus,
            Phase::ShortBreak | Phase::LongBreak => SessionKind::Break,
        }
    }

    pub fn is_focus(self) -> bool {
        self == Phase::Focus
    }
}

impl SessionKind {
    /// Label used for a history record when no task text was entered
    pub fn default_label(self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus Session",
            SessionKind::Break => "Break",
        }
    }
}

/// Outcome of sequencing a completed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequenced {
    pub next: Phase,
    pub focus_completed: u32,
}

/// Decide which phase follows `completed`.
///
/// `focus_completed` is the counter before this completion; the returned
/// value already includes it when `completed` was a focus phase.
pub fn next_phase(completed: Phase, focus_completed: u32) -> Sequenced {
    match completed {
        Phase::Focus => {
            let focus_completed = focus_completed.saturating_add(1);
            let next = if focus_completed % LONG_BREAK_EVERY == 0 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            };
            Sequenced { next, focus_completed }
        }
        Phase::ShortBreak | Phase::LongBreak => Sequenced {
            next: Phase::Focus,
            focus_completed,
        },
    }
}
