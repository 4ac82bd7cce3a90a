use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, RwLock, RwLockReadGuard};

use crate::error::AutomationError;
use crate::platform::{HostConnection, SessionHandle};

struct Binding {
    handle: SessionHandle,
    generation: u64,
    connected_at: DateTime<Utc>,
}

/// Public view of the current binding
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub label: String,
    pub generation: u64,
    pub connected_at: DateTime<Utc>,
}

/// The binding between the core and one live host connection.
///
/// States are Unbound and Bound. `connect` always ends Bound (swapping the
/// handle when already bound), `disconnect` always ends Unbound. Both bump
/// the generation counter so completions issued under an older binding can
/// be recognised and ignored.
pub struct AutomationSession {
    binding: RwLock<Option<Binding>>,
    generation: watch::Sender<u64>,
}

impl AutomationSession {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            binding: RwLock::new(None),
            generation,
        }
    }

    /// Bind to a new host connection, replacing any stale one
    pub async fn connect(&self, handle: SessionHandle) {
        let mut binding = self.binding.write().await;
        let generation = self.bump_generation();
        let label = handle.label().to_string();

        let previous = binding.replace(Binding {
            handle,
            generation,
            connected_at: Utc::now(),
        });

        match previous {
            Some(stale) => tracing::info!(
                "Host connection {} (generation {}) replaced by {} (generation {})",
                stale.handle.label(),
                stale.generation,
                label,
                generation
            ),
            None => tracing::info!("Host connection {} bound (generation {})", label, generation),
        }
    }

    /// Drop the current binding. Returns whether one was present.
    pub async fn disconnect(&self) -> bool {
        let mut binding = self.binding.write().await;
        match binding.take() {
            Some(stale) => {
                let generation = self.bump_generation();
                tracing::info!(
                    "Host connection {} unbound after {}s (generation {} -> {})",
                    stale.handle.label(),
                    (Utc::now() - stale.connected_at).num_seconds(),
                    stale.generation,
                    generation
                );
                true
            }
            None => {
                tracing::debug!("Disconnect requested while unbound");
                false
            }
        }
    }

    /// Borrow the active connection for the duration of one operation.
    ///
    /// The returned guard blocks `connect`/`disconnect` until it is dropped.
    pub async fn current(&self) -> Result<BoundSession<'_>, AutomationError> {
        let guard = self.binding.read().await;
        RwLockReadGuard::try_map(guard, |binding| binding.as_ref())
            .map(|guard| BoundSession { guard })
            .map_err(|_| AutomationError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.binding.read().await.is_some()
    }

    pub async fn info(&self) -> Option<SessionInfo> {
        self.binding.read().await.as_ref().map(|b| SessionInfo {
            label: b.handle.label().to_string(),
            generation: b.generation,
            connected_at: b.connected_at,
        })
    }

    /// Receiver that observes every generation change
    pub(crate) fn watch_generation(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    fn bump_generation(&self) -> u64 {
        let mut next = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            next = *generation;
        });
        next
    }
}

impl Default for AutomationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed, currently valid host connection
pub struct BoundSession<'a> {
    guard: RwLockReadGuard<'a, Binding>,
}

impl BoundSession<'_> {
    pub fn host(&self) -> &dyn HostConnection {
        self.guard.handle.as_ref()
    }

    pub fn label(&self) -> &str {
        self.guard.handle.label()
    }

    pub fn generation(&self) -> u64 {
        self.guard.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::simulated::SimulatedHost;
    use std::sync::Arc;

    fn host(label: &str) -> SessionHandle {
        Arc::new(SimulatedHost::new(label))
    }

    #[tokio::test]
    async fn test_starts_unbound() {
        let session = AutomationSession::new();
        assert!(!session.is_connected().await);
        assert!(session.info().await.is_none());
        assert_eq!(
            session.current().await.err(),
            Some(AutomationError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_reconnect_last_writer_wins() {
        let session = AutomationSession::new();
        session.connect(host("h1")).await;
        session.connect(host("h2")).await;

        let bound = session.current().await.unwrap();
        assert_eq!(bound.label(), "h2");
        assert_eq!(bound.generation(), 2);
    }

    #[tokio::test]
    async fn test_disconnect_unbinds() {
        let session = AutomationSession::new();
        session.connect(host("h1")).await;

        assert!(session.disconnect().await);
        assert!(!session.is_connected().await);
        assert!(session.current().await.is_err());

        // A second disconnect is a no-op
        assert!(!session.disconnect().await);
    }

    #[tokio::test]
    async fn test_generation_moves_on_every_transition() {
        let session = AutomationSession::new();
        let watcher = session.watch_generation();
        assert_eq!(*watcher.borrow(), 0);

        session.connect(host("h1")).await;
        assert_eq!(*watcher.borrow(), 1);

        session.disconnect().await;
        assert_eq!(*watcher.borrow(), 2);

        session.connect(host("h2")).await;
        assert_eq!(session.info().await.unwrap().generation, 3);
    }
}
