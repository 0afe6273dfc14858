use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
    pub max_sessions: usize,
    pub started_at: String,
}

/// Overall status from session usage. Pure so it can be tested directly.
pub fn determine_overall_status(active_sessions: usize, max_sessions: usize) -> &'static str {
    if active_sessions >= max_sessions {
        "saturated"
    } else {
        "ready"
    }
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(build_health_response(&state))
}

pub fn build_health_response(state: &SharedState) -> HealthResponse {
    let sessions = state.sessions();
    let active = sessions.active_sessions();
    let max = sessions.max_sessions();

    HealthResponse {
        status: determine_overall_status(active, max).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: active,
        max_sessions: max,
        started_at: state.started_at.to_rfc3339(),
    }
}
