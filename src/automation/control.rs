use tokio::sync::watch;

use super::types::ControlState;
use crate::error::AutomationError;

/// Enable/disable/status contract exposed to the external controller.
///
/// Starts Disabled on every process start and is never persisted.
pub struct ControlStateManager {
    state: watch::Sender<ControlState>,
}

impl ControlStateManager {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ControlState::Disabled);
        Self { state }
    }

    pub fn enable(&self) -> ControlState {
        self.transition(ControlState::Enabled)
    }

    pub fn disable(&self) -> ControlState {
        self.transition(ControlState::Disabled)
    }

    pub fn status(&self) -> ControlState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlState> {
        self.state.subscribe()
    }

    /// Fail with `ControlDisabled` unless automation is currently permitted
    pub fn ensure_enabled(&self) -> Result<(), AutomationError> {
        if self.status().is_enabled() {
            Ok(())
        } else {
            Err(AutomationError::ControlDisabled)
        }
    }

    fn transition(&self, next: ControlState) -> ControlState {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::info!("Automation control {:?} -> {:?}", previous, next);
        }
        next
    }
}

impl Default for ControlStateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled() {
        let control = ControlStateManager::new();
        assert_eq!(control.status(), ControlState::Disabled);
        assert_eq!(control.ensure_enabled(), Err(AutomationError::ControlDisabled));
    }

    #[test]
    fn test_status_follows_last_transition() {
        let control = ControlStateManager::new();
        control.disable();
        control.enable();
        assert_eq!(control.status(), ControlState::Enabled);
        assert!(control.ensure_enabled().is_ok());
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let control = ControlStateManager::new();
        assert_eq!(control.enable(), ControlState::Enabled);
        assert_eq!(control.enable(), ControlState::Enabled);
        assert_eq!(control.status(), ControlState::Enabled);

        assert_eq!(control.disable(), ControlState::Disabled);
        assert_eq!(control.disable(), ControlState::Disabled);
        assert_eq!(control.status(), ControlState::Disabled);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let control = ControlStateManager::new();
        let mut rx = control.subscribe();

        control.enable();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ControlState::Enabled);
    }
}
