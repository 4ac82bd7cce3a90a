use super::session::{AutomationSession, BoundSession};
use super::types::{ActionArguments, NodeAction, NodeInfo};
use crate::error::AutomationError;
use crate::platform::shielded;

/// The focused editable node, borrowed from the live tree.
///
/// Holds the session borrow, so it cannot outlive the operation that
/// resolved it and the binding cannot change underneath it.
pub struct FocusTarget<'a> {
    session: BoundSession<'a>,
    node: NodeInfo,
}

impl FocusTarget<'_> {
    pub fn node(&self) -> &NodeInfo {
        &self.node
    }

    pub(crate) async fn perform(
        &self,
        action: NodeAction,
        arguments: &ActionArguments,
    ) -> anyhow::Result<bool> {
        shielded(self.session.host().perform_action(&self.node.id, action, arguments)).await
    }
}

/// Finds the node currently holding input focus, if it accepts text
pub struct FocusResolver<'a> {
    session: &'a AutomationSession,
}

impl<'a> FocusResolver<'a> {
    pub fn new(session: &'a AutomationSession) -> Self {
        Self { session }
    }

    /// Query the live tree; nothing is cached between calls
    pub async fn resolve_editable_focus(&self) -> Result<Option<FocusTarget<'a>>, AutomationError> {
        let session = self.session.current().await?;

        let focused = shielded(session.host().find_input_focus())
            .await
            .map_err(|e| {
                tracing::error!("Error querying input focus on {}: {:#}", session.label(), e);
                AutomationError::FocusQuery {
                    cause: format!("{:#}", e),
                }
            })?;

        match focused {
            None => {
                tracing::debug!("No node holds input focus");
                Ok(None)
            }
            Some(node) if !node.accepts_text() => {
                tracing::debug!(
                    "Focused node {} is not editable ({:?})",
                    node.id,
                    node.class_name
                );
                Ok(None)
            }
            Some(node) => Ok(Some(FocusTarget { session, node })),
        }
    }
}
