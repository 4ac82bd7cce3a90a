use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{InjectTextRequest, InjectTextResponse};

use super::super::state::AppState;

/// Set the text of the focused editable node
pub async fn inject_text(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<InjectTextRequest>, JsonRejection>,
) -> Result<Json<InjectTextResponse>> {
    let Json(request) = payload?;
    tracing::info!("Injecting {} chars", request.text.chars().count());

    let injected = state.core.inject(&request.text).await?;

    Ok(Json(InjectTextResponse {
        injected: true,
        node_id: injected.node_id,
        chars: injected.chars,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{AutomationCore, HostEvent, NodeInfo};
    use crate::error::{AppError, AutomationError};
    use crate::platform::simulated::SimulatedHost;

    #[tokio::test]
    async fn test_inject_into_focused_field() {
        let core = Arc::new(AutomationCore::default());
        let host = Arc::new(SimulatedHost::new("sim"));
        host.set_focus(Some(NodeInfo::new("search").focused().editable()));
        core.handle_host_event(HostEvent::ServiceConnected(host.clone())).await;
        core.enable();
        let state = Arc::new(AppState::new(core));

        let Json(response) = inject_text(
            State(state),
            Ok(Json(InjectTextRequest {
                text: "bonjour".to_string(),
            })),
        )
        .await
        .unwrap();

        assert!(response.injected);
        assert_eq!(response.node_id, "search");
        assert_eq!(host.focused_text().as_deref(), Some("bonjour"));
    }

    #[tokio::test]
    async fn test_inject_without_connection() {
        let core = Arc::new(AutomationCore::default());
        core.enable();
        let state = Arc::new(AppState::new(core));

        let err = inject_text(
            State(state),
            Ok(Json(InjectTextRequest {
                text: "hi".to_string(),
            })),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Automation(AutomationError::NotConnected)));
    }

    #[tokio::test]
    async fn test_inject_without_text_field() {
        let core = Arc::new(AutomationCore::default());
        core.enable();
        let state = Arc::new(AppState::new(core));

        let err = inject_text(State(state), Json::<InjectTextRequest>::from_bytes(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
