use serde::Serialize;

use crate::automation::{GestureOutcome, NodeId, SessionInfo};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Shape returned by `enableControl` / `disableControl`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ControlResponse {
    pub enabled: bool,
}

/// Shape returned by `status`
#[derive(Debug, Serialize)]
pub struct ControlStatusResponse {
    pub enabled: bool,
    pub gated: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionInfo>,
}

#[derive(Debug, Serialize)]
pub struct GestureAcceptedResponse {
    pub accepted: bool,
    pub gesture_id: String,
}

/// Where a gesture stands from the HTTP caller's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureStatus {
    Pending,
    Completed,
    Cancelled,
    Abandoned,
}

impl From<GestureOutcome> for GestureStatus {
    fn from(outcome: GestureOutcome) -> Self {
        match outcome {
            GestureOutcome::Completed => GestureStatus::Completed,
            GestureOutcome::Cancelled => GestureStatus::Cancelled,
            GestureOutcome::Abandoned => GestureStatus::Abandoned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GestureStatusResponse {
    pub gesture_id: String,
    pub kind: String,
    pub status: GestureStatus,
}

#[derive(Debug, Serialize)]
pub struct InjectTextResponse {
    pub injected: bool,
    pub node_id: NodeId,
    pub chars: usize,
}
