//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    tasks::ticker_task,
    timer::{DisplayState, FocusTimer, Preset, SessionRecord, TodayStats},
};

/// Shared state: the focus timer, its ticker and server metadata
#[derive(Debug)]
pub struct AppState {
    /// The focus timer; the only mutator of countdown state
    pub timer: Arc<Mutex<FocusTimer>>,
    /// Handle of the running ticker task, if any
    ticker: Mutex<Option<JoinHandle<()>>>,
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Display snapshots, published after every change
    pub display_tx: watch::Sender<DisplayState>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayState>,
}

impl AppState {
    /// Create a new AppState around `timer`, ticking once per second
    pub fn new(port: u16, host: String, timer: FocusTimer) -> Self {
        Self::with_tick_period(port, host, timer, Duration::from_secs(1))
    }

    pub fn with_tick_period(port: u16, host: String, timer: FocusTimer, tick_period: Duration) -> Self {
        let (display_tx, display_rx) = watch::channel(timer.display_state());

        Self {
            timer: Arc::new(Mutex::new(timer)),
            ticker: Mutex::new(None),
            tick_period,
            start_time: Instant::now(),
            port,
            host,
            display_tx,
            _display_rx: display_rx,
        }
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, FocusTimer>, String> {
        self.timer
            .lock()
            .map_err(|e| format!("Failed to lock focus timer: {}", e))
    }

    fn publish(&self, display: &DisplayState) {
        if let Err(e) = self.display_tx.send(display.clone()) {
            warn!("Failed to publish display update: {}", e);
        }
    }

    /// Apply `action` to the timer and publish the resulting display state
    fn update<F, T>(&self, action: F) -> Result<(T, DisplayState), String>
    where
        F: FnOnce(&mut FocusTimer) -> T,
    {
        let mut timer = self.lock_timer()?;
        let result = action(&mut *timer);
        let display = timer.display_state();
        drop(timer);

        self.publish(&display);
        Ok((result, display))
    }

    /// Start the countdown and its ticker; returns whether it was started
    pub fn start(self: &Arc<Self>) -> Result<(bool, DisplayState), String> {
        let (epoch, display) = self.update(|timer| {
            timer.start().then(|| timer.engine().epoch())
        })?;
        if let Some(epoch) = epoch {
            self.spawn_ticker(epoch)?;
        }
        Ok((epoch.is_some(), display))
    }

    /// Resume a paused countdown; returns whether it was paused
    pub fn resume(self: &Arc<Self>) -> Result<(bool, DisplayState), String> {
        let (epoch, display) = self.update(|timer| {
            timer.resume().then(|| timer.engine().epoch())
        })?;
        if let Some(epoch) = epoch {
            self.spawn_ticker(epoch)?;
        }
        Ok((epoch.is_some(), display))
    }

    /// Pause the countdown. The ticker is cancelled before the state changes.
    pub fn pause(&self) -> Result<(bool, DisplayState), String> {
        self.cancel_ticker()?;
        self.update(|timer| timer.pause())
    }

    /// Rewind the current phase
    pub fn reset(&self) -> Result<DisplayState, String> {
        self.cancel_ticker()?;
        self.update(|timer| timer.reset()).map(|(_, display)| display)
    }

    /// Switch preset, rewinding the current phase
    pub fn set_preset(&self, preset: Preset) -> Result<DisplayState, String> {
        self.cancel_ticker()?;
        self.update(|timer| timer.set_preset(preset))
            .map(|(_, display)| display)
    }

    /// Edit the task label; returns whether the edit was accepted
    pub fn set_task_label(&self, label: &str) -> Result<(bool, DisplayState), String> {
        self.update(|timer| timer.set_task_label(label))
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<DisplayState, String> {
        self.update(|timer| timer.set_sound_enabled(enabled))
            .map(|(_, display)| display)
    }

    /// Deliver one tick from ticker generation `epoch`.
    /// Returns whether that generation should keep ticking.
    pub fn tick(&self, epoch: u64) -> Result<bool, String> {
        let mut timer = self.lock_timer()?;
        if let Some(record) = timer.tick_for(epoch) {
            debug!("Recorded session #{}", record.id);
        }
        let keep_ticking = timer.engine().is_counting(epoch);
        let display = timer.display_state();
        drop(timer);

        self.publish(&display);
        Ok(keep_ticking)
    }

    fn spawn_ticker(self: &Arc<Self>, epoch: u64) -> Result<(), String> {
        let mut ticker = self
            .ticker
            .lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;
        // A newer start/resume may have won the race for the ticker slot
        if !self.lock_timer()?.engine().is_counting(epoch) {
            debug!("Not spawning ticker for stale epoch {}", epoch);
            return Ok(());
        }
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        debug!("Spawning ticker for epoch {}", epoch);
        *ticker = Some(tokio::spawn(ticker_task(Arc::clone(self), epoch)));
        Ok(())
    }

    /// Abort the ticker task, if one is running
    pub fn cancel_ticker(&self) -> Result<(), String> {
        let mut ticker = self
            .ticker
            .lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;
        if let Some(handle) = ticker.take() {
            handle.abort();
            debug!("Ticker cancelled");
        }
        Ok(())
    }

    /// Stop ticking for good; called when the server shuts down
    pub fn shutdown(&self) {
        if let Err(e) = self.cancel_ticker() {
            warn!("Failed to cancel ticker on shutdown: {}", e);
        }
        info!("Focus timer stopped");
    }

    pub fn get_display_state(&self) -> Result<DisplayState, String> {
        self.lock_timer().map(|timer| timer.display_state())
    }

    /// History newest first, optionally truncated to `limit` records
    pub fn get_history(&self, limit: Option<usize>) -> Result<Vec<SessionRecord>, String> {
        self.lock_timer().map(|timer| match limit {
            Some(n) => timer.recent(n),
            None => timer.history(),
        })
    }

    pub fn get_today_stats(&self) -> Result<TodayStats, String> {
        self.lock_timer().map(|timer| timer.today_stats())
    }

    /// Preset, sound flag and completed focus count
    pub fn get_settings(&self) -> Result<(Preset, bool, u32), String> {
        self.lock_timer().map(|timer| {
            (
                timer.engine().preset(),
                timer.sound_enabled(),
                timer.sessions_completed(),
            )
        })
    }

    /// Subscribe to display updates
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
