use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::automation::gesture::GestureCallback;
use crate::automation::types::{
    ActionArguments, DisplaySize, GestureDescription, NodeAction, NodeId, NodeInfo,
};
use crate::config::Backend;

pub mod desktop;
pub mod input;
pub mod simulated;

#[cfg(target_os = "windows")]
pub mod windows;

/// A live connection to the host accessibility subsystem.
///
/// Abstracts OS-specific accessibility and gesture APIs behind a common
/// interface. The session owns the only handle; everything else borrows it
/// for a single operation.
#[async_trait]
pub trait HostConnection: Send + Sync {
    /// Human-readable name used in logs and status output
    fn label(&self) -> &str;

    /// Size of the display gestures land on, when the host knows it
    fn display_size(&self) -> Option<DisplaySize> {
        None
    }

    /// Get the node currently holding input focus
    async fn find_input_focus(&self) -> Result<Option<NodeInfo>>;

    /// Perform an action on a node with a parameter bundle.
    /// Returns whether the host accepted the action.
    async fn perform_action(
        &self,
        node: &NodeId,
        action: NodeAction,
        arguments: &ActionArguments,
    ) -> Result<bool>;

    /// Submit a gesture for asynchronous execution.
    ///
    /// Must return as soon as the gesture is accepted (or refused); the real
    /// outcome goes through `callback` later.
    async fn dispatch_gesture(
        &self,
        gesture: GestureDescription,
        callback: Option<GestureCallback>,
    ) -> Result<bool>;
}

/// Shared handle to the active host connection
pub type SessionHandle = Arc<dyn HostConnection>;

/// Create the host connection for the configured backend
pub fn create_connection(backend: Backend) -> Result<SessionHandle> {
    match backend {
        Backend::Desktop => Ok(Arc::new(desktop::DesktopConnection::new()?)),
        Backend::Simulated => Ok(Arc::new(simulated::SimulatedHost::auto_completing(
            "simulated",
        ))),
    }
}

/// Run a host call, turning a panic into an error
pub(crate) async fn shielded<T, F>(call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(anyhow!("host call panicked: {}", panic_message(&*panic))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shielded_passes_results_through() {
        let ok = shielded(async { Ok::<u8, anyhow::Error>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = shielded(async { Err::<u8, _>(anyhow!("nope")) }).await;
        assert_eq!(err.unwrap_err().to_string(), "nope");
    }

    async fn explode() -> Result<u8> {
        panic!("accessibility service died")
    }

    #[tokio::test]
    async fn test_shielded_catches_panics() {
        let result = shielded(explode()).await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("accessibility service died"));
    }
}
