//! In-memory host connection
//!
//! Holds a single focused node, records every gesture and node action it is
//! asked to perform, and keeps gesture callbacks until the test (or the
//! auto-complete timer) reports an outcome. Fault injection switches let
//! tests drive every error path of the core.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::HostConnection;
use crate::automation::gesture::GestureCallback;
use crate::automation::types::{
    ActionArguments, DisplaySize, GestureDescription, NodeAction, NodeId, NodeInfo,
};

/// A node action the host was asked to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformedAction {
    pub node_id: NodeId,
    pub action: NodeAction,
    pub arguments: ActionArguments,
}

#[derive(Default)]
struct SimState {
    focus: Option<NodeInfo>,
    focus_queries: usize,
    focus_failure: Option<String>,
    actions: Vec<PerformedAction>,
    action_failure: Option<String>,
    reject_actions: bool,
    gestures: Vec<GestureDescription>,
    pending: VecDeque<GestureCallback>,
    gesture_failure: Option<String>,
    reject_gestures: bool,
    panic_on_gesture: bool,
}

pub struct SimulatedHost {
    label: String,
    display: Option<DisplaySize>,
    auto_complete: bool,
    state: Mutex<SimState>,
}

impl SimulatedHost {
    /// Host whose gestures stay pending until completed by hand
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            display: None,
            auto_complete: false,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Host that reports every gesture completed once its duration elapses
    pub fn auto_completing(label: impl Into<String>) -> Self {
        Self {
            auto_complete: true,
            ..Self::new(label)
        }
    }

    pub fn with_display(mut self, display: DisplaySize) -> Self {
        self.display = Some(display);
        self
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============ Accessibility tree ============

    pub fn set_focus(&self, node: Option<NodeInfo>) {
        self.state().focus = node;
    }

    /// Text of the focused node, as last set
    pub fn focused_text(&self) -> Option<String> {
        self.state().focus.as_ref().and_then(|n| n.text.clone())
    }

    pub fn focus_queries(&self) -> usize {
        self.state().focus_queries
    }

    pub fn fail_focus_queries(&self, message: impl Into<String>) {
        self.state().focus_failure = Some(message.into());
    }

    pub fn performed_actions(&self) -> Vec<PerformedAction> {
        self.state().actions.clone()
    }

    pub fn reject_actions(&self, reject: bool) {
        self.state().reject_actions = reject;
    }

    pub fn fail_actions(&self, message: impl Into<String>) {
        self.state().action_failure = Some(message.into());
    }

    // ============ Gesture channel ============

    pub fn submitted_gestures(&self) -> Vec<GestureDescription> {
        self.state().gestures.clone()
    }

    pub fn pending_gestures(&self) -> usize {
        self.state().pending.len()
    }

    /// Report the oldest pending gesture as completed
    pub fn complete_next(&self) -> bool {
        let callback = self.state().pending.pop_front();
        callback.map(GestureCallback::on_completed).is_some()
    }

    /// Report the oldest pending gesture as cancelled
    pub fn cancel_next(&self) -> bool {
        let callback = self.state().pending.pop_front();
        callback.map(GestureCallback::on_cancelled).is_some()
    }

    pub fn complete_all(&self) -> usize {
        let pending: Vec<_> = self.state().pending.drain(..).collect();
        let count = pending.len();
        pending.into_iter().for_each(GestureCallback::on_completed);
        count
    }

    pub fn fail_gestures(&self, message: impl Into<String>) {
        self.state().gesture_failure = Some(message.into());
    }

    pub fn reject_gestures(&self, reject: bool) {
        self.state().reject_gestures = reject;
    }

    pub fn panic_on_gesture(&self, panic: bool) {
        self.state().panic_on_gesture = panic;
    }
}

#[async_trait]
impl HostConnection for SimulatedHost {
    fn label(&self) -> &str {
        &self.label
    }

    fn display_size(&self) -> Option<DisplaySize> {
        self.display
    }

    async fn find_input_focus(&self) -> Result<Option<NodeInfo>> {
        let mut state = self.state();
        state.focus_queries += 1;
        if let Some(message) = &state.focus_failure {
            return Err(anyhow!("{}", message));
        }
        Ok(state.focus.clone().filter(|n| n.is_focused))
    }

    async fn perform_action(
        &self,
        node: &NodeId,
        action: NodeAction,
        arguments: &ActionArguments,
    ) -> Result<bool> {
        let mut state = self.state();
        if let Some(message) = &state.action_failure {
            return Err(anyhow!("{}", message));
        }

        state.actions.push(PerformedAction {
            node_id: node.clone(),
            action,
            arguments: arguments.clone(),
        });

        if state.reject_actions {
            return Ok(false);
        }

        match (action, state.focus.as_mut()) {
            (NodeAction::SetText, Some(focused)) if &focused.id == node && focused.is_editable => {
                focused.text = arguments.set_text.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn dispatch_gesture(
        &self,
        gesture: GestureDescription,
        callback: Option<GestureCallback>,
    ) -> Result<bool> {
        let mut state = self.state();
        if state.panic_on_gesture {
            drop(state);
            panic!("simulated gesture channel crashed");
        }
        if let Some(message) = &state.gesture_failure {
            return Err(anyhow!("{}", message));
        }
        if state.reject_gestures {
            return Ok(false);
        }

        let duration = gesture.total_duration();
        state.gestures.push(gesture);

        if let Some(callback) = callback {
            if self.auto_complete {
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    callback.on_completed();
                });
            } else {
                state.pending.push_back(callback);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unfocused_node_is_not_reported() {
        let host = SimulatedHost::new("sim");
        host.set_focus(Some(NodeInfo::new("n").editable()));
        assert_eq!(host.find_input_focus().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_text_on_other_node_is_refused() {
        let host = SimulatedHost::new("sim");
        host.set_focus(Some(NodeInfo::new("a").focused().editable()));

        let accepted = host
            .perform_action(&"b".to_string(), NodeAction::SetText, &ActionArguments::set_text("x"))
            .await
            .unwrap();
        assert!(!accepted);
        assert_eq!(host.focused_text(), None);
    }

    #[tokio::test]
    async fn test_gestures_without_callback_are_not_pending() {
        let host = SimulatedHost::new("sim");
        let gesture = crate::automation::GestureRequest::click(1, 1).to_description();
        assert!(host.dispatch_gesture(gesture, None).await.unwrap());
        assert_eq!(host.pending_gestures(), 0);
        assert_eq!(host.submitted_gestures().len(), 1);
        assert!(!host.complete_next());
    }
}
