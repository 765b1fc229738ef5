//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::{
    state::AppState,
    timer::{DisplayState, Preset, RECENT_SESSIONS},
};
use super::responses::{
    ApiResponse, HealthResponse, HistoryQuery, HistoryResponse, PresetEntry, PresetRequest,
    SoundRequest, StatsResponse, StatusResponse, TaskRequest,
};

fn internal_error(action: &str, e: String) -> StatusCode {
    error!("Failed to {}: {}", action, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Wrap a transition result, reporting `ignored` when nothing changed
fn respond(action: &str, (changed, display): (bool, DisplayState)) -> Json<ApiResponse> {
    if changed {
        Json(ApiResponse::ok(action, display))
    } else {
        Json(ApiResponse::ignored(action, display))
    }
}

/// Handle POST /start - Start or continue the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.start().map_err(|e| internal_error("start timer", e))?;
    info!("Start endpoint called");
    Ok(respond("start", result))
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.pause().map_err(|e| internal_error("pause timer", e))?;
    info!("Pause endpoint called");
    Ok(respond("pause", result))
}

/// Handle POST /resume - Continue a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.resume().map_err(|e| internal_error("resume timer", e))?;
    info!("Resume endpoint called");
    Ok(respond("resume", result))
}

/// Handle POST /reset - Rewind the current phase
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let display = state.reset().map_err(|e| internal_error("reset timer", e))?;
    info!("Reset endpoint called");
    Ok(Json(ApiResponse::ok("reset", display)))
}

/// Handle POST /task - Set the label of the current focus phase
pub async fn task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (accepted, display) = state
        .set_task_label(&request.label)
        .map_err(|e| internal_error("set task label", e))?;

    if accepted {
        info!("Task label set to {:?}", request.label);
        Ok(Json(ApiResponse::ok("task", display)))
    } else {
        warn!("Task label edit ignored while running");
        Ok(Json(ApiResponse::ignored("task", display)))
    }
}

/// Handle POST /preset - Switch duration preset
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PresetRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let preset: Preset = request.preset.parse().map_err(|e| {
        warn!("Rejected preset request: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let display = state
        .set_preset(preset)
        .map_err(|e| internal_error("set preset", e))?;
    Ok(Json(ApiResponse::ok("preset", display)))
}

/// Handle POST /sound - Toggle the completion chime
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let display = state
        .set_sound_enabled(request.enabled)
        .map_err(|e| internal_error("set sound", e))?;
    Ok(Json(ApiResponse::ok("sound", display)))
}

/// Handle GET /status - Return the clock display and settings
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let display = state.get_display_state().map_err(|e| internal_error("read timer", e))?;
    let (preset, sound_enabled, sessions_completed) = state
        .get_settings()
        .map_err(|e| internal_error("read settings", e))?;

    Ok(Json(StatusResponse {
        state: display,
        preset,
        preset_label: preset.label(),
        sound_enabled,
        sessions_completed,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    }))
}

/// Handle GET /history - Completed phases, newest first.
/// Defaults to the recent view; `?limit=n` or `?all=true` override it.
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let limit = if query.all {
        None
    } else {
        Some(query.limit.unwrap_or(RECENT_SESSIONS))
    };
    let sessions = state
        .get_history(limit)
        .map_err(|e| internal_error("read history", e))?;

    Ok(Json(HistoryResponse {
        count: sessions.len(),
        sessions,
    }))
}

/// Handle GET /stats - Today's focus figures
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, StatusCode> {
    let stats = state
        .get_today_stats()
        .map_err(|e| internal_error("read stats", e))?;

    Ok(Json(StatsResponse {
        stats,
        timestamp: chrono::Utc::now(),
    }))
}

/// Handle GET /presets - The preset table
pub async fn presets_handler() -> Json<Vec<PresetEntry>> {
    Json(Preset::ALL.into_iter().map(PresetEntry::from).collect())
}

/// Handle GET /events - Stream display updates as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let updates = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let display = rx.borrow_and_update().clone();
        let event = match Event::default().event("display").json_data(&display) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode display event: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Some((Ok(event), (rx, false)))
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
