use serde::Serialize;

use super::control::ControlStateManager;
use super::focus::FocusResolver;
use super::session::AutomationSession;
use super::types::{ActionArguments, NodeAction, NodeId};
use crate::error::AutomationError;

/// Result of a successful set-text action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Injected {
    pub node_id: NodeId,
    pub chars: usize,
}

/// Sets the text of whichever editable node holds focus right now
pub struct TextInjector<'a> {
    resolver: FocusResolver<'a>,
    control: Option<&'a ControlStateManager>,
}

impl<'a> TextInjector<'a> {
    pub fn new(session: &'a AutomationSession) -> Self {
        Self {
            resolver: FocusResolver::new(session),
            control: None,
        }
    }

    /// Refuse to inject while `control` reports Disabled
    pub fn gated_by(mut self, control: &'a ControlStateManager) -> Self {
        self.control = Some(control);
        self
    }

    pub async fn inject(&self, text: &str) -> Result<Injected, AutomationError> {
        if let Some(control) = self.control {
            control.ensure_enabled()?;
        }

        let target = self
            .resolver
            .resolve_editable_focus()
            .await
            .map_err(|e| match e {
                AutomationError::FocusQuery { cause } => AutomationError::Injection { cause },
                other => other,
            })?
            .ok_or(AutomationError::NoEditableFocus)?;

        let node_id = target.node().id.clone();
        let arguments = ActionArguments::set_text(text);

        match target.perform(NodeAction::SetText, &arguments).await {
            Ok(true) => {
                tracing::debug!("Set {} chars on node {}", text.chars().count(), node_id);
                Ok(Injected {
                    node_id,
                    chars: text.chars().count(),
                })
            }
            Ok(false) => {
                tracing::warn!("Host refused set-text on node {}", node_id);
                Err(AutomationError::Injection {
                    cause: format!("host refused set-text on node {}", node_id),
                })
            }
            Err(e) => {
                tracing::error!("Error performing text input on {}: {:#}", node_id, e);
                Err(AutomationError::Injection {
                    cause: format!("{:#}", e),
                })
            }
        }
    }
}
