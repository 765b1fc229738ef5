//! The focus clock: engine, sequencer, recorder and chime wired together

use std::{fmt, sync::Arc};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{
    next_phase, today_stats, DisplayState, PhaseCompleted, Preset, SessionRecord,
    SessionRecorder, TimerEngine, TodayStats,
};
use crate::services::Chime;

/// Startup options for a [`FocusTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOptions {
    pub preset: Preset,
    pub sound_enabled: bool,
    /// Keep counting into the next phase instead of waiting for `start`
    pub auto_continue: bool,
    pub history_limit: Option<usize>,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            preset: Preset::Classic,
            sound_enabled: true,
            auto_continue: false,
            history_limit: None,
        }
    }
}

pub struct FocusTimer {
    engine: TimerEngine,
    recorder: SessionRecorder,
    focus_completed: u32,
    sound_enabled: bool,
    auto_continue: bool,
    chime: Arc<dyn Chime>,
}

impl fmt::Debug for FocusTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTimer")
            .field("engine", &self.engine)
            .field("history_len", &self.recorder.len())
            .field("focus_completed", &self.focus_completed)
            .field("sound_enabled", &self.sound_enabled)
            .field("auto_continue", &self.auto_continue)
            .finish_non_exhaustive()
    }
}

impl FocusTimer {
    pub fn new(options: FocusOptions, chime: Arc<dyn Chime>) -> Self {
        Self {
            engine: TimerEngine::new(options.preset),
            recorder: SessionRecorder::with_limit(options.history_limit),
            focus_completed: 0,
            sound_enabled: options.sound_enabled,
            auto_continue: options.auto_continue,
            chime,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn start(&mut self) -> bool {
        let started = self.engine.start();
        if started {
            info!(
                "{} started with {}s remaining",
                self.engine.phase().label(),
                self.engine.remaining_seconds()
            );
        }
        started
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.engine.pause();
        if paused {
            info!("Paused at {}s remaining", self.engine.remaining_seconds());
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.engine.resume();
        if resumed {
            info!("Resumed at {}s remaining", self.engine.remaining_seconds());
        }
        resumed
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        info!("{} reset", self.engine.phase().label());
    }

    pub fn set_task_label(&mut self, label: &str) -> bool {
        self.engine.set_task_label(label)
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.engine.set_preset(preset);
        info!("Preset set to {}", preset.label());
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        info!("Sound notifications {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Completed focus phases since startup
    pub fn sessions_completed(&self) -> u32 {
        self.focus_completed
    }

    /// One second elapsed. Returns the new history record when a phase ended.
    pub fn tick(&mut self) -> Option<SessionRecord> {
        let completed = self.engine.tick()?;
        Some(self.complete(completed))
    }

    /// Tick from scheduler generation `epoch`
    pub fn tick_for(&mut self, epoch: u64) -> Option<SessionRecord> {
        let completed = self.engine.tick_for(epoch)?;
        Some(self.complete(completed))
    }

    // Sequence, then record, then notify
    fn complete(&mut self, completed: PhaseCompleted) -> SessionRecord {
        let step = next_phase(completed.phase, self.focus_completed);
        self.focus_completed = step.focus_completed;
        self.engine.arm_next(step.next, self.auto_continue);

        let record = self.recorder.record(&completed, Utc::now()).clone();
        info!(
            "{} complete ({}m, \"{}\"), next: {}",
            completed.phase.label(),
            completed.minutes,
            record.label,
            step.next.label()
        );

        if self.sound_enabled {
            if let Err(e) = self.chime.play() {
                warn!("Completion chime failed: {}", e);
            }
        } else {
            debug!("Sound disabled, skipping chime");
        }

        record
    }

    pub fn display_state(&self) -> DisplayState {
        self.engine.display_state()
    }

    /// Full history, newest first
    pub fn history(&self) -> Vec<SessionRecord> {
        self.recorder.records().cloned().collect()
    }

    pub fn recent(&self, n: usize) -> Vec<SessionRecord> {
        self.recorder.recent(n)
    }

    pub fn today_stats(&self) -> TodayStats {
        today_stats(self.recorder.records())
    }
}
