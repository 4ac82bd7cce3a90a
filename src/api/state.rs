use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::automation::{AutomationCore, Dispatched, GestureId, GestureOutcome};
use crate::models::GestureStatus;

/// How long finished gesture records stay queryable
const FINISHED_RETENTION: Duration = Duration::from_secs(300);

/// How long a gesture may stay pending before its record is given up as abandoned
pub const PENDING_LIMIT: Duration = Duration::from_secs(60);

/// Outcome tracking for one gesture accepted over HTTP
#[derive(Debug, Clone)]
pub struct GestureRecord {
    pub kind: &'static str,
    pub status: GestureStatus,
    pub submitted_at: Instant,
    pub finished_at: Option<Instant>,
}

/// Shared application state
pub struct AppState {
    pub core: Arc<AutomationCore>,

    /// Gestures accepted over HTTP: gesture_id -> record
    pub gestures: DashMap<GestureId, GestureRecord>,
}

impl AppState {
    pub fn new(core: Arc<AutomationCore>) -> Self {
        Self {
            core,
            gestures: DashMap::new(),
        }
    }

    /// Record a dispatched gesture and follow its completion in the background
    pub fn track(self: &Arc<Self>, dispatched: Dispatched) -> GestureId {
        self.prune_finished();

        let Dispatched {
            gesture_id,
            request,
            completion,
        } = dispatched;

        self.gestures.insert(
            gesture_id.clone(),
            GestureRecord {
                kind: request.name(),
                status: GestureStatus::Pending,
                submitted_at: Instant::now(),
                finished_at: None,
            },
        );

        let state = Arc::clone(self);
        let id = gesture_id.clone();
        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(PENDING_LIMIT, completion.wait()).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!("Gesture {} got no report within {:?}", id, PENDING_LIMIT);
                    GestureOutcome::Abandoned
                }
            };
            if let Some(mut record) = state.gestures.get_mut(&id) {
                record.status = outcome.into();
                record.finished_at = Some(Instant::now());
                tracing::debug!(
                    "Gesture {} finished as {:?} after {:?}",
                    id,
                    outcome,
                    record.submitted_at.elapsed()
                );
            }
        });

        gesture_id
    }

    pub fn gesture(&self, gesture_id: &str) -> Option<GestureRecord> {
        self.gestures.get(gesture_id).map(|r| r.clone())
    }

    fn prune_finished(&self) {
        self.gestures.retain(|_, record| match record.finished_at {
            Some(finished) => finished.elapsed() < FINISHED_RETENTION,
            None => true,
        });
    }
}
