use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::input::InputController;
use super::HostConnection;
use crate::automation::gesture::GestureCallback;
use crate::automation::types::{
    ActionArguments, DisplaySize, GestureDescription, NodeAction, NodeId, NodeInfo,
};

/// Host connection for the local desktop session.
///
/// Gestures are played back with the mouse on a blocking task; the tree is
/// read through the platform accessibility API where one is wired up
/// (UI Automation on Windows).
pub struct DesktopConnection {
    label: String,
    display: Option<DisplaySize>,
    #[cfg(target_os = "windows")]
    tree: super::windows::WindowsFocus,
}

impl DesktopConnection {
    pub fn new() -> Result<Self> {
        // Probe input once so a missing display server fails here, not per gesture
        let input = InputController::new()?;
        let display = match input.main_display() {
            Ok(display) => Some(display),
            Err(e) => {
                tracing::warn!("Display size unknown, gesture bounds unchecked: {}", e);
                None
            }
        };

        Ok(Self {
            label: format!("desktop-{}", std::env::consts::OS),
            display,
            #[cfg(target_os = "windows")]
            tree: super::windows::WindowsFocus::new()?,
        })
    }
}

#[async_trait]
impl HostConnection for DesktopConnection {
    fn label(&self) -> &str {
        &self.label
    }

    fn display_size(&self) -> Option<DisplaySize> {
        self.display
    }

    async fn find_input_focus(&self) -> Result<Option<NodeInfo>> {
        #[cfg(target_os = "windows")]
        {
            self.tree.focused_node().await
        }

        #[cfg(not(target_os = "windows"))]
        {
            Err(anyhow!(
                "Accessibility tree queries are not supported on {}",
                std::env::consts::OS
            ))
        }
    }

    async fn perform_action(
        &self,
        node: &NodeId,
        action: NodeAction,
        arguments: &ActionArguments,
    ) -> Result<bool> {
        #[cfg(target_os = "windows")]
        {
            match action {
                NodeAction::SetText => {
                    let text = arguments
                        .set_text
                        .as_deref()
                        .ok_or_else(|| anyhow!("set-text requires a text argument"))?;
                    self.tree.set_focused_value(node, text).await
                }
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            let _ = (node, arguments);
            Err(anyhow!(
                "Node action {:?} is not supported on {}",
                action,
                std::env::consts::OS
            ))
        }
    }

    async fn dispatch_gesture(
        &self,
        gesture: GestureDescription,
        callback: Option<GestureCallback>,
    ) -> Result<bool> {
        // Playback runs detached; only its outcome is reported back.
        // The controller is created on the blocking thread that uses it.
        tokio::task::spawn_blocking(move || {
            let result = InputController::new().and_then(|mut input| input.play(&gesture));
            match (result, callback) {
                (Ok(()), Some(callback)) => callback.on_completed(),
                (Err(e), Some(callback)) => {
                    tracing::warn!("Gesture {} interrupted: {:#}", callback.gesture_id(), e);
                    callback.on_cancelled();
                }
                (Err(e), None) => tracing::warn!("Gesture interrupted: {:#}", e),
                (Ok(()), None) => {}
            }
        });

        Ok(true)
    }
}
