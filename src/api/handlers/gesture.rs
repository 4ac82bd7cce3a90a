use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::automation::GestureRequest;
use crate::error::{AppError, Result};
use crate::models::{ClickRequest, GestureAcceptedResponse, GestureStatusResponse, ScrollRequest};

use super::super::state::AppState;

async fn submit(state: Arc<AppState>, request: GestureRequest) -> Result<Json<GestureAcceptedResponse>> {
    let dispatched = state.core.dispatch(request).await?;
    let gesture_id = state.track(dispatched);

    Ok(Json(GestureAcceptedResponse {
        accepted: true,
        gesture_id,
    }))
}

/// Submit a click. Returns once the host accepted it; poll
/// `get_gesture_status` for the outcome.
pub async fn click(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ClickRequest>, JsonRejection>,
) -> Result<Json<GestureAcceptedResponse>> {
    let Json(request) = payload?;
    tracing::info!("Click at ({}, {})", request.x, request.y);
    submit(state, request.into()).await
}

pub async fn scroll(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ScrollRequest>, JsonRejection>,
) -> Result<Json<GestureAcceptedResponse>> {
    let Json(request) = payload?;
    tracing::info!(
        "Scroll ({}, {}) -> ({}, {})",
        request.start_x,
        request.start_y,
        request.end_x,
        request.end_y
    );
    submit(state, request.into()).await
}

pub async fn get_gesture_status(
    State(state): State<Arc<AppState>>,
    Path(gesture_id): Path<String>,
) -> Result<Json<GestureStatusResponse>> {
    let record = state
        .gesture(&gesture_id)
        .ok_or_else(|| AppError::NotFound(format!("gesture {}", gesture_id)))?;

    Ok(Json(GestureStatusResponse {
        gesture_id,
        kind: record.kind.to_string(),
        status: record.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{AutomationCore, HostEvent};
    use crate::error::AutomationError;
    use crate::models::GestureStatus;
    use crate::platform::simulated::SimulatedHost;

    async fn connected_state() -> (Arc<AppState>, Arc<SimulatedHost>) {
        let core = Arc::new(AutomationCore::default());
        let host = Arc::new(SimulatedHost::new("sim"));
        core.handle_host_event(HostEvent::ServiceConnected(host.clone())).await;
        core.enable();
        (Arc::new(AppState::new(core)), host)
    }

    async fn status_of(state: &Arc<AppState>, gesture_id: &str) -> GestureStatus {
        let Json(status) = get_gesture_status(State(state.clone()), Path(gesture_id.to_string()))
            .await
            .unwrap();
        status.status
    }

    #[tokio::test]
    async fn test_click_accepted_then_completed() {
        let (state, host) = connected_state().await;

        let Json(accepted) = click(State(state.clone()), Ok(Json(ClickRequest { x: 10, y: 20 })))
            .await
            .unwrap();
        assert!(accepted.accepted);
        assert_eq!(status_of(&state, &accepted.gesture_id).await, GestureStatus::Pending);

        host.complete_next();
        // Let the tracking task observe the outcome
        let mut status = GestureStatus::Pending;
        for _ in 0..50 {
            status = status_of(&state, &accepted.gesture_id).await;
            if status != GestureStatus::Pending {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(status, GestureStatus::Completed);
    }

    #[tokio::test]
    async fn test_scroll_while_disabled() {
        let (state, host) = connected_state().await;
        state.core.disable();

        let err = scroll(
            State(state.clone()),
            Ok(Json(ScrollRequest {
                start_x: 0,
                start_y: 0,
                end_x: 100,
                end_y: 200,
            })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Automation(AutomationError::ControlDisabled)));
        assert!(host.submitted_gestures().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_click_is_rejected() {
        let (state, host) = connected_state().await;

        let err = click(
            State(state),
            Json::<ClickRequest>::from_bytes(br#"{"x": -4, "y": 20}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(host.submitted_gestures().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_gesture() {
        let (state, _host) = connected_state().await;
        let err = get_gesture_status(State(state), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
