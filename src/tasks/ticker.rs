//! Ticker background task
//!
//! Delivers one tick per period to the focus timer while its run generation
//! is current. Pausing, resetting or switching presets aborts the task; a
//! tick that slips through anyway carries a stale epoch and is dropped.

use std::sync::Arc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Tick the timer until generation `epoch` stops counting
pub async fn ticker_task(state: Arc<AppState>, epoch: u64) {
    info!("Starting ticker for epoch {}", epoch);

    let period = state.tick_period;
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        match state.tick(epoch) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Epoch {} no longer counting, ticker exiting", epoch);
                break;
            }
            Err(e) => {
                error!("Tick failed: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::sleep;

    use crate::{
        services::Chime,
        state::AppState,
        timer::{FocusOptions, FocusTimer, Phase, SessionKind},
    };
    use std::sync::Arc;

    struct Silent;

    impl Chime for Silent {
        fn play(&self) -> Result<(), String> {
            Ok(())
        }
    }

    fn test_state(options: FocusOptions) -> Arc<AppState> {
        let timer = FocusTimer::new(options, Arc::new(Silent));
        Arc::new(AppState::new(0, "127.0.0.1".to_string(), timer))
    }

    fn remaining(state: &AppState) -> u64 {
        state.get_display_state().expect("display state").remaining_seconds
    }

    #[tokio::test(start_paused = true)]
    async fn full_focus_phase_records_and_arms_short_break() {
        let state = test_state(FocusOptions::default());
        state.set_task_label("Study").expect("label");
        state.start().expect("start");

        sleep(Duration::from_millis(1_500_500)).await;

        let display = state.get_display_state().expect("display state");
        assert_eq!(display.phase, Phase::ShortBreak);
        assert_eq!(display.remaining_seconds, 300);
        assert!(!display.is_running);

        let history = state.get_history(None).expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].label, "Study");
        assert_eq!(history[0].duration_minutes, 25);
        assert_eq!(history[0].kind, SessionKind::Focus);
        assert_eq!(state.get_today_stats().expect("stats").sessions_completed, 1);

        // Armed only: nothing moves until the next start
        sleep(Duration::from_secs(30)).await;
        assert_eq!(remaining(&state), 300);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_resume_continues() {
        let state = test_state(FocusOptions::default());
        state.start().expect("start");
        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(remaining(&state), 1490);

        state.pause().expect("pause");
        sleep(Duration::from_secs(60)).await;
        assert_eq!(remaining(&state), 1490);

        state.resume().expect("resume");
        sleep(Duration::from_millis(5_250)).await;
        assert_eq!(remaining(&state), 1485);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_the_ticker() {
        let state = test_state(FocusOptions::default());
        state.start().expect("start");
        sleep(Duration::from_millis(3_500)).await;
        assert_eq!(remaining(&state), 1497);

        let display = state.reset().expect("reset");
        assert_eq!(display.remaining_seconds, 1500);
        assert!(!display.is_running);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(remaining(&state), 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_does_not_double_tick() {
        let state = test_state(FocusOptions::default());
        state.start().expect("start");
        sleep(Duration::from_millis(2_500)).await;
        state.start().expect("second start is a no-op");
        sleep(Duration::from_secs(2)).await;
        assert_eq!(remaining(&state), 1496);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_continue_runs_into_the_break() {
        let state = test_state(FocusOptions {
            auto_continue: true,
            ..FocusOptions::default()
        });
        state.start().expect("start");
        sleep(Duration::from_millis(1_510_500)).await;

        let display = state.get_display_state().expect("display state");
        assert_eq!(display.phase, Phase::ShortBreak);
        assert!(display.is_running);
        assert_eq!(display.remaining_seconds, 290);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_each_tick() {
        let state = test_state(FocusOptions::default());
        let mut rx = state.subscribe();
        state.start().expect("start");
        sleep(Duration::from_millis(1_500)).await;

        assert!(rx.has_changed().expect("channel open"));
        assert_eq!(rx.borrow_and_update().remaining_seconds, 1499);
    }
}
