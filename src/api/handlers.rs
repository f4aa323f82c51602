//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::state::{AppState, TimerState};
use super::responses::{AdjustRequest, ApiResponse, HealthResponse, StatusResponse};

fn intent_response(
    intent: &str,
    result: Result<TimerState, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            let message = format!("{} -> {}", intent, timer.formatted_time);
            Ok(Json(ApiResponse::from_state(message, timer)))
        }
        Err(e) => {
            error!("Failed to handle {} intent: {}", intent, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /adjust - Step one field of the configured duration
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    intent_response("adjust", state.adjust(request.unit, request.operator))
}

/// Handle POST /start - Start or restart the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    info!("Start endpoint called");
    intent_response("start", state.start())
}

/// Handle POST /cancel - Pause the countdown
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    info!("Cancel endpoint called");
    intent_response("cancel", state.cancel())
}

/// Handle POST /toggle - Start when idle, pause when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    info!("Toggle endpoint called");
    intent_response("toggle", state.toggle())
}

/// Handle GET /state - Return current timer state
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every state change as a server-sent event
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.controller.subscribe();
    // First event carries the current snapshot
    rx.mark_changed();

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        let event = Event::default()
            .event("state")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                warn!("Failed to encode state event: {}", e);
                Event::default().comment("encoding error")
            });
        Some((Ok(event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
