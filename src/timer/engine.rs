//! Countdown state machine

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Phase, Preset};

/// Engine lifecycle. `Completed` is never observable: the tick that reaches
/// zero leaves the engine `Idle` (or `Running` on the next phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Raised by the tick that drives the countdown to zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseCompleted {
    pub phase: Phase,
    /// Configured length of the finished phase, not the elapsed wall time
    pub minutes: u64,
    pub task_label: String,
}

/// What the presentation layer needs to draw the clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub remaining_seconds: u64,
    pub remaining_display: String,
    pub phase: Phase,
    pub phase_label: String,
    pub is_running: bool,
    pub is_paused: bool,
    pub progress_fraction: f64,
    pub task_label: String,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    remaining_seconds: u64,
    phase: Phase,
    status: TimerStatus,
    preset: Preset,
    task_label: String,
    /// Bumped whenever a scheduled tick must stop applying
    epoch: u64,
}

impl TimerEngine {
    /// Create an idle engine armed on the focus phase of `preset`
    pub fn new(preset: Preset) -> Self {
        Self {
            remaining_seconds: preset.seconds_for(Phase::Focus),
            phase: Phase::Focus,
            status: TimerStatus::Idle,
            preset,
            task_label: String::new(),
            epoch: 0,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Running or paused; paused implies running
    pub fn is_running(&self) -> bool {
        self.status != TimerStatus::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.status == TimerStatus::Paused
    }

    /// True while ticks from the scheduler generation `epoch` should be delivered
    pub fn is_counting(&self, epoch: u64) -> bool {
        self.status == TimerStatus::Running && self.epoch == epoch
    }

    pub fn configured_seconds(&self) -> u64 {
        self.preset.seconds_for(self.phase)
    }

    /// Begin or continue counting down. Returns false when already running.
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Running => {
                debug!("start ignored, already running");
                false
            }
            TimerStatus::Idle | TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                self.epoch += 1;
                true
            }
        }
    }

    /// Freeze the countdown. Only valid while running.
    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            debug!("pause ignored in {:?}", self.status);
            return false;
        }
        self.status = TimerStatus::Paused;
        self.epoch += 1;
        true
    }

    /// Continue a paused countdown
    pub fn resume(&mut self) -> bool {
        if self.status != TimerStatus::Paused {
            debug!("resume ignored in {:?}", self.status);
            return false;
        }
        self.start()
    }

    /// Stop and rewind the current phase to its full duration
    pub fn reset(&mut self) {
        self.reset_to_phase(self.phase);
    }

    /// Arm `phase` idle with its full configured duration
    pub fn reset_to_phase(&mut self, phase: Phase) {
        self.epoch += 1;
        self.status = TimerStatus::Idle;
        self.phase = phase;
        self.remaining_seconds = self.configured_seconds();
    }

    /// Switch presets; the current phase restarts idle with the new duration
    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.reset();
    }

    /// Edit the task label. Rejected while the countdown is actively running.
    pub fn set_task_label(&mut self, label: &str) -> bool {
        if self.status == TimerStatus::Running {
            debug!("task label edit rejected while running");
            return false;
        }
        self.task_label = label.to_string();
        true
    }

    /// Arm the phase chosen after a completion. With `keep_running` the
    /// countdown continues under the same scheduler generation.
    pub(crate) fn arm_next(&mut self, phase: Phase, keep_running: bool) {
        self.phase = phase;
        self.remaining_seconds = self.configured_seconds();
        if keep_running {
            self.status = TimerStatus::Running;
        } else {
            self.status = TimerStatus::Idle;
            self.epoch += 1;
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing unless running. The tick that reaches zero stops the
    /// engine before returning the completion.
    pub fn tick(&mut self) -> Option<PhaseCompleted> {
        if self.status != TimerStatus::Running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }

        self.status = TimerStatus::Idle;
        Some(PhaseCompleted {
            phase: self.phase,
            minutes: self.preset.minutes_for(self.phase),
            task_label: self.task_label.clone(),
        })
    }

    /// Tick on behalf of scheduler generation `epoch`; stale ticks are dropped
    pub fn tick_for(&mut self, epoch: u64) -> Option<PhaseCompleted> {
        if self.epoch != epoch {
            debug!("dropping stale tick from epoch {} (current {})", epoch, self.epoch);
            return None;
        }
        self.tick()
    }

    /// Elapsed share of the current phase in `[0, 1]`
    pub fn progress_fraction(&self) -> f64 {
        let total = self.configured_seconds() as f64;
        if total <= 0.0 {
            return 0.0;
        }
        ((total - self.remaining_seconds as f64) / total).clamp(0.0, 1.0)
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            remaining_seconds: self.remaining_seconds,
            remaining_display: format_clock(self.remaining_seconds),
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            is_running: self.is_running(),
            is_paused: self.is_paused(),
            progress_fraction: self.progress_fraction(),
            task_label: self.task_label.clone(),
        }
    }
}

/// Format seconds as `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(preset: Preset) -> TimerEngine {
        let mut engine = TimerEngine::new(preset);
        assert!(engine.start());
        engine
    }

    #[test]
    fn reset_to_phase_arms_full_duration() {
        for preset in Preset::ALL {
            let mut engine = TimerEngine::new(preset);
            for phase in Phase::ALL {
                engine.reset_to_phase(phase);
                assert_eq!(engine.remaining_seconds(), preset.minutes_for(phase) * 60);
                assert_eq!(engine.status(), TimerStatus::Idle);
            }
        }
    }

    #[test]
    fn ticks_decrement_by_exactly_one() {
        let mut engine = running(Preset::Classic);
        for _ in 0..100 {
            assert!(engine.tick().is_none());
        }
        assert_eq!(engine.remaining_seconds(), 1400);
    }

    #[test]
    fn zero_crossing_stops_synchronously_and_completes_once() {
        let mut engine = running(Preset::Short);
        let mut completions = Vec::new();
        for _ in 0..(15 * 60 + 10) {
            if let Some(done) = engine.tick() {
                completions.push(done);
            }
        }
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].phase, Phase::Focus);
        assert_eq!(completions[0].minutes, 15);
        assert_eq!(engine.remaining_seconds(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn idle_and_paused_engines_ignore_ticks() {
        let mut engine = TimerEngine::new(Preset::Classic);
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 1500);

        engine.start();
        engine.tick();
        assert!(engine.pause());
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(engine.remaining_seconds(), 1499);

        assert!(engine.resume());
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 1498);
    }

    #[test]
    fn invalid_transitions_are_no_ops() {
        let mut engine = TimerEngine::new(Preset::Classic);
        assert!(!engine.pause());
        assert!(!engine.resume());
        assert_eq!(engine.status(), TimerStatus::Idle);

        engine.start();
        assert!(!engine.start());
        assert!(!engine.resume());
        assert_eq!(engine.status(), TimerStatus::Running);
    }

    #[test]
    fn paused_implies_running() {
        let mut engine = running(Preset::Classic);
        engine.pause();
        assert!(engine.is_paused());
        assert!(engine.is_running());
    }

    #[test]
    fn stale_epoch_ticks_are_dropped() {
        let mut engine = running(Preset::Classic);
        let old = engine.epoch();
        engine.reset();
        engine.start();
        assert!(engine.tick_for(old).is_none());
        assert_eq!(engine.remaining_seconds(), 1500);

        let current = engine.epoch();
        engine.tick_for(current);
        assert_eq!(engine.remaining_seconds(), 1499);
    }

    #[test]
    fn label_edit_is_rejected_only_while_actively_running() {
        let mut engine = TimerEngine::new(Preset::Classic);
        assert!(engine.set_task_label("Study"));
        engine.start();
        assert!(!engine.set_task_label("Other"));
        assert_eq!(engine.task_label(), "Study");
        engine.pause();
        assert!(engine.set_task_label("Other"));
        assert_eq!(engine.task_label(), "Other");
    }

    #[test]
    fn set_preset_rewinds_current_phase() {
        let mut engine = running(Preset::Classic);
        engine.tick();
        engine.set_preset(Preset::Extended);
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_seconds(), 50 * 60);
    }

    #[test]
    fn progress_and_clock_formatting() {
        let mut engine = running(Preset::Classic);
        assert_eq!(engine.progress_fraction(), 0.0);
        for _ in 0..750 {
            engine.tick();
        }
        let display = engine.display_state();
        assert!((display.progress_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(display.remaining_display, "12:30");
        assert_eq!(display.phase_label, "Focus Time");
        assert_eq!(format_clock(0), "00:00");
    }
}
