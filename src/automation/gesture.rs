//! Gesture dispatch with fire-and-forget submission.
//!
//! `dispatch` returns as soon as the host accepts the stroke. The host later
//! reports the real outcome through the [`GestureCallback`] it was handed,
//! and callers that care can await the matching [`GestureCompletion`].

use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use super::control::ControlStateManager;
use super::session::AutomationSession;
use super::types::{GestureId, GestureOutcome, GestureRequest};
use crate::error::AutomationError;
use crate::platform::shielded;

/// Handed to the host with every submitted gesture.
///
/// Reports issued after the session has moved to another generation are
/// dropped, which the awaiting side observes as [`GestureOutcome::Abandoned`].
#[derive(Debug)]
pub struct GestureCallback {
    gesture_id: GestureId,
    generation: u64,
    session_generation: watch::Receiver<u64>,
    sender: oneshot::Sender<GestureOutcome>,
}

impl GestureCallback {
    pub fn gesture_id(&self) -> &str {
        &self.gesture_id
    }

    pub fn on_completed(self) {
        self.deliver(GestureOutcome::Completed);
    }

    pub fn on_cancelled(self) {
        self.deliver(GestureOutcome::Cancelled);
    }

    /// Returns whether the outcome reached the awaiting side
    fn deliver(self, outcome: GestureOutcome) -> bool {
        let GestureCallback {
            gesture_id,
            generation,
            session_generation,
            sender,
        } = self;

        // The borrow holds off a generation bump until the send is done
        let live = session_generation.borrow();
        if *live != generation {
            tracing::debug!(
                "Ignoring {:?} for gesture {} (issued under generation {}, now {})",
                outcome,
                gesture_id,
                generation,
                *live
            );
            return false;
        }
        // The caller may have dropped its completion; that is fine
        sender.send(outcome).is_ok()
    }
}

/// Caller-side view of a submitted gesture's eventual outcome
#[derive(Debug)]
pub struct GestureCompletion {
    generation: u64,
    receiver: oneshot::Receiver<GestureOutcome>,
    session_generation: watch::Receiver<u64>,
}

impl GestureCompletion {
    /// Wait until the host reports back or the session is torn down
    pub async fn wait(self) -> GestureOutcome {
        let GestureCompletion {
            generation,
            mut receiver,
            mut session_generation,
        } = self;

        tokio::select! {
            biased;
            outcome = &mut receiver => outcome.unwrap_or(GestureOutcome::Abandoned),
            _ = session_generation.wait_for(|live| *live != generation) => {
                receiver.try_recv().unwrap_or(GestureOutcome::Abandoned)
            }
        }
    }
}

/// Acknowledgement that the host accepted a gesture for execution
#[derive(Debug)]
pub struct Dispatched {
    pub gesture_id: GestureId,
    pub request: GestureRequest,
    pub completion: GestureCompletion,
}

/// Turns gesture requests into strokes and submits them to the bound host
pub struct GestureDispatcher<'a> {
    session: &'a AutomationSession,
    control: Option<&'a ControlStateManager>,
}

impl<'a> GestureDispatcher<'a> {
    pub fn new(session: &'a AutomationSession) -> Self {
        Self {
            session,
            control: None,
        }
    }

    /// Refuse to dispatch while `control` reports Disabled
    pub fn gated_by(mut self, control: &'a ControlStateManager) -> Self {
        self.control = Some(control);
        self
    }

    pub async fn dispatch(&self, request: GestureRequest) -> Result<Dispatched, AutomationError> {
        if let Some(control) = self.control {
            control.ensure_enabled()?;
        }

        let bound = self.session.current().await?;
        let host = bound.host();

        if let Some(display) = host.display_size() {
            if let Some(point) = request.path().into_iter().find(|p| !display.contains(*p)) {
                return Err(AutomationError::InvalidGesture {
                    reason: format!(
                        "({}, {}) is outside the {}x{} display",
                        point.x, point.y, display.width, display.height
                    ),
                });
            }
        }

        let gesture_id = Uuid::new_v4().to_string();
        let generation = bound.generation();
        let (sender, receiver) = oneshot::channel();

        let callback = GestureCallback {
            gesture_id: gesture_id.clone(),
            generation,
            session_generation: self.session.watch_generation(),
            sender,
        };

        let description = request.to_description();
        tracing::debug!(
            "Submitting {} {} to {}: {:?}",
            request.name(),
            gesture_id,
            bound.label(),
            description
        );

        match shielded(host.dispatch_gesture(description, Some(callback))).await {
            Ok(true) => Ok(Dispatched {
                gesture_id,
                request,
                completion: GestureCompletion {
                    generation,
                    receiver,
                    session_generation: self.session.watch_generation(),
                },
            }),
            Ok(false) => {
                tracing::warn!("Host {} rejected {} {}", bound.label(), request.name(), gesture_id);
                Err(AutomationError::Dispatch {
                    cause: format!("host rejected the {}", request.name()),
                })
            }
            Err(e) => {
                tracing::error!("Error performing {}: {:#}", request.name(), e);
                Err(AutomationError::Dispatch {
                    cause: format!("{:#}", e),
                })
            }
        }
    }
}
