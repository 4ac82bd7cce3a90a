use super::control::ControlStateManager;
use super::gesture::{Dispatched, GestureDispatcher};
use super::session::AutomationSession;
use super::text::{Injected, TextInjector};
use super::types::{ControlState, GestureRequest};
use crate::error::AutomationError;
use crate::platform::SessionHandle;

/// Lifecycle callbacks delivered by the host accessibility subsystem
pub enum HostEvent {
    /// The host bound the automation surface to this process
    ServiceConnected(SessionHandle),
    /// The host unbound the automation surface
    ServiceUnbound,
    /// The host asked the service to interrupt its feedback
    Interrupted,
    /// A raw UI event observed by the host, identified by its event type
    Accessibility(String),
}

/// Process-wide automation context.
///
/// Owns the one session and the control state, and hands out dispatcher,
/// resolver and injector instances borrowed from them. Share it behind an
/// `Arc` instead of looking it up globally.
pub struct AutomationCore {
    session: AutomationSession,
    control: ControlStateManager,
    gate: bool,
}

impl AutomationCore {
    /// `gate` decides whether dispatch/inject consult the control state
    pub fn new(gate: bool) -> Self {
        if !gate {
            tracing::warn!("Control gating is off; actions run regardless of control state");
        }
        Self {
            session: AutomationSession::new(),
            control: ControlStateManager::new(),
            gate,
        }
    }

    pub fn session(&self) -> &AutomationSession {
        &self.session
    }

    pub fn control(&self) -> &ControlStateManager {
        &self.control
    }

    pub fn is_gated(&self) -> bool {
        self.gate
    }

    pub async fn handle_host_event(&self, event: HostEvent) {
        match event {
            HostEvent::ServiceConnected(handle) => self.session.connect(handle).await,
            HostEvent::ServiceUnbound => {
                self.session.disconnect().await;
            }
            HostEvent::Interrupted => tracing::warn!("Host connection interrupted"),
            HostEvent::Accessibility(kind) => tracing::debug!("Accessibility event: {}", kind),
        }
    }

    pub fn enable(&self) -> ControlState {
        self.control.enable()
    }

    pub fn disable(&self) -> ControlState {
        self.control.disable()
    }

    pub fn status(&self) -> ControlState {
        self.control.status()
    }

    pub fn dispatcher(&self) -> GestureDispatcher<'_> {
        let dispatcher = GestureDispatcher::new(&self.session);
        if self.gate {
            dispatcher.gated_by(&self.control)
        } else {
            dispatcher
        }
    }

    pub fn injector(&self) -> TextInjector<'_> {
        let injector = TextInjector::new(&self.session);
        if self.gate {
            injector.gated_by(&self.control)
        } else {
            injector
        }
    }

    pub async fn dispatch(&self, request: GestureRequest) -> Result<Dispatched, AutomationError> {
        self.dispatcher().dispatch(request).await
    }

    pub async fn inject(&self, text: &str) -> Result<Injected, AutomationError> {
        self.injector().inject(text).await
    }
}

impl Default for AutomationCore {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::types::NodeInfo;
    use crate::platform::simulated::SimulatedHost;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lifecycle_events() {
        let core = AutomationCore::default();
        let host = Arc::new(SimulatedHost::new("sim"));

        core.handle_host_event(HostEvent::ServiceConnected(host)).await;
        assert!(core.session().is_connected().await);

        core.handle_host_event(HostEvent::ServiceUnbound).await;
        assert!(!core.session().is_connected().await);
    }

    #[tokio::test]
    async fn test_interrupt_and_events_leave_state_alone() {
        let core = AutomationCore::default();
        core.handle_host_event(HostEvent::ServiceConnected(Arc::new(SimulatedHost::new("sim"))))
            .await;
        core.enable();
        let generation = core.session().info().await.unwrap().generation;

        core.handle_host_event(HostEvent::Interrupted).await;
        core.handle_host_event(HostEvent::Accessibility("window_state_changed".to_string()))
            .await;

        assert_eq!(core.session().info().await.unwrap().generation, generation);
        assert_eq!(core.status(), ControlState::Enabled);
        assert!(core.dispatch(GestureRequest::click(1, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_gated_core_follows_control_state() {
        let core = AutomationCore::default();
        let host = Arc::new(SimulatedHost::new("sim"));
        host.set_focus(Some(NodeInfo::new("field").focused().editable()));
        core.handle_host_event(HostEvent::ServiceConnected(host.clone())).await;

        assert_eq!(
            core.dispatch(GestureRequest::click(1, 1)).await.unwrap_err(),
            AutomationError::ControlDisabled
        );
        assert_eq!(
            core.inject("hi").await.unwrap_err(),
            AutomationError::ControlDisabled
        );

        core.enable();
        assert!(core.dispatch(GestureRequest::click(1, 1)).await.is_ok());
        assert!(core.inject("hi").await.is_ok());

        core.disable();
        assert!(core.dispatch(GestureRequest::click(1, 1)).await.is_err());
        assert_eq!(host.submitted_gestures().len(), 1);
    }

    #[tokio::test]
    async fn test_ungated_core_ignores_control_state() {
        let core = AutomationCore::new(false);
        core.handle_host_event(HostEvent::ServiceConnected(Arc::new(SimulatedHost::new("sim"))))
            .await;

        assert_eq!(core.status(), ControlState::Disabled);
        assert!(core.dispatch(GestureRequest::click(1, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_gate_takes_precedence_over_connection() {
        let core = AutomationCore::default();
        assert_eq!(
            core.dispatch(GestureRequest::click(1, 1)).await.unwrap_err(),
            AutomationError::ControlDisabled
        );

        core.enable();
        assert_eq!(
            core.dispatch(GestureRequest::click(1, 1)).await.unwrap_err(),
            AutomationError::NotConnected
        );
    }
}
