//! Control surface for the external controller:
//! `enableControl`, `disableControl` and `status`.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::{ControlResponse, ControlStatusResponse};

use super::super::state::AppState;

pub async fn enable_control(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let enabled = state.core.enable().is_enabled();
    Json(ControlResponse { enabled })
}

pub async fn disable_control(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let enabled = state.core.disable().is_enabled();
    Json(ControlResponse { enabled })
}

pub async fn control_status(State(state): State<Arc<AppState>>) -> Json<ControlStatusResponse> {
    let session = state.core.session().info().await;
    Json(ControlStatusResponse {
        enabled: state.core.status().is_enabled(),
        gated: state.core.is_gated(),
        connected: session.is_some(),
        session,
    })
}
