//! Session recorder: append-only history of completed phases

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PhaseCompleted, SessionKind};

/// Size of the recent-sessions view
pub const RECENT_SESSIONS: usize = 10;

/// One completed phase. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: u64,
    pub label: String,
    pub duration_minutes: u64,
    pub completed_at: DateTime<Utc>,
    pub kind: SessionKind,
}

/// Owns the session history, newest first
#[derive(Debug, Clone, Default)]
pub struct SessionRecorder {
    records: VecDeque<SessionRecord>,
    last_id: u64,
    limit: Option<usize>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` records, dropping the oldest
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record a completed phase and return the stored record
    pub fn record(&mut self, completed: &PhaseCompleted, at: DateTime<Utc>) -> &SessionRecord {
        let kind = completed.phase.kind();
        let label = if completed.task_label.is_empty() {
            kind.default_label().to_string()
        } else {
            completed.task_label.clone()
        };

        self.last_id += 1;
        self.records.push_front(SessionRecord {
            id: self.last_id,
            label,
            duration_minutes: completed.minutes,
            completed_at: at,
            kind,
        });

        if let Some(limit) = self.limit {
            // Never evict the record just written
            self.records.truncate(limit.max(1));
        }

        &self.records[0]
    }

    /// Full history, newest first
    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    /// The `n` newest records
    pub fn recent(&self, n: usize) -> Vec<SessionRecord> {
        self.records.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;

    fn completed(phase: Phase, minutes: u64, label: &str) -> PhaseCompleted {
        PhaseCompleted {
            phase,
            minutes,
            task_label: label.to_string(),
        }
    }

    #[test]
    fn records_newest_first_with_increasing_ids() {
        let mut recorder = SessionRecorder::new();
        let now = Utc::now();
        recorder.record(&completed(Phase::Focus, 25, "Study"), now);
        recorder.record(&completed(Phase::ShortBreak, 5, ""), now);

        let ids: Vec<u64> = recorder.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(recorder.recent(1)[0].kind, SessionKind::Break);
    }

    #[test]
    fn empty_labels_fall_back_to_kind_defaults() {
        let mut recorder = SessionRecorder::new();
        let now = Utc::now();
        assert_eq!(recorder.record(&completed(Phase::Focus, 25, ""), now).label, "Focus Session");
        assert_eq!(recorder.record(&completed(Phase::LongBreak, 15, ""), now).label, "Break");
        assert_eq!(recorder.record(&completed(Phase::Focus, 25, "Essay"), now).label, "Essay");
    }

    #[test]
    fn whitespace_label_is_kept_as_typed() {
        let mut recorder = SessionRecorder::new();
        let record = recorder.record(&completed(Phase::Focus, 25, "  "), Utc::now());
        assert_eq!(record.label, "  ");
    }

    #[test]
    fn limit_drops_oldest_but_ids_keep_growing() {
        let mut recorder = SessionRecorder::with_limit(Some(2));
        let now = Utc::now();
        for _ in 0..5 {
            recorder.record(&completed(Phase::Focus, 25, ""), now);
        }
        let ids: Vec<u64> = recorder.records().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4]);
    }
}
