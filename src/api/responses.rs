//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DisplayState, Preset, PresetDurations, SessionRecord, TodayStats};

/// Response to every state-changing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// `ok`, or `ignored` when the request was valid but had no effect
    pub status: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub state: DisplayState,
}

impl ApiResponse {
    pub fn new(status: &str, action: &str, state: DisplayState) -> Self {
        Self {
            status: status.to_string(),
            action: action.to_string(),
            timestamp: Utc::now(),
            state,
        }
    }

    pub fn ok(action: &str, state: DisplayState) -> Self {
        Self::new("ok", action, state)
    }

    pub fn ignored(action: &str, state: DisplayState) -> Self {
        Self::new("ignored", action, state)
    }
}

/// Clock display plus settings and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: DisplayState,
    pub preset: Preset,
    pub preset_label: String,
    pub sound_enabled: bool,
    pub sessions_completed: u32,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: TodayStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetEntry {
    pub id: Preset,
    pub label: String,
    #[serde(flatten)]
    pub durations: PresetDurations,
}

impl From<Preset> for PresetEntry {
    fn from(preset: Preset) -> Self {
        Self {
            id: preset,
            label: preset.label(),
            durations: preset.durations(),
        }
    }
}

/// Body of POST /task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub label: String,
}

/// Body of POST /preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetRequest {
    pub preset: String,
}

/// Body of POST /sound
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundRequest {
    pub enabled: bool,
}

/// Query of GET /history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    /// Return every retained record instead of the recent view
    #[serde(default)]
    pub all: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
