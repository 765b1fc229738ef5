//! Figures derived from the session history on every read

use serde::{Deserialize, Serialize};

use super::{SessionKind, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TodayStats {
    pub sessions_completed: u64,
    pub focus_minutes: u64,
    /// Whole hours of focus, floored
    pub focus_hours: u64,
}

/// Project today's stats from the history
pub fn today_stats<'a, I>(records: I) -> TodayStats
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let (sessions_completed, focus_minutes) = records
        .into_iter()
        .filter(|r| r.kind == SessionKind::Focus)
        .fold((0u64, 0u64), |(count, minutes), r| {
            (count + 1, minutes + r.duration_minutes)
        });

    TodayStats {
        sessions_completed,
        focus_minutes,
        focus_hours: focus_minutes / 60,
    }
}
