//! Automation control core
//!
//! Performs UI actions (tap, scroll, text entry) on behalf of an external
//! controller, gated by an explicit enable/disable control state.
//!
//! ## Architecture
//!
//! - `AutomationCore` - Process-wide context, owns everything below
//! - `AutomationSession` - The one binding to a live host connection
//! - `ControlStateManager` - Enable/disable/status for the controller
//! - `GestureDispatcher` - Click/scroll strokes, fire-and-forget submission
//! - `FocusResolver` / `TextInjector` - Set text on the focused editable node
//!
//! Host-specific code lives behind [`crate::platform::HostConnection`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use a11y_control::automation::{AutomationCore, GestureRequest, HostEvent};
//!
//! let core = AutomationCore::default();
//! core.handle_host_event(HostEvent::ServiceConnected(handle)).await;
//! core.enable();
//!
//! let dispatched = core.dispatch(GestureRequest::click(120, 640)).await?;
//! // Optional: wait for the host to confirm
//! let outcome = dispatched.completion.wait().await;
//!
//! core.inject("hello").await?;
//! ```

pub mod control;
pub mod focus;
pub mod gesture;
pub mod manager;
pub mod session;
pub mod text;
pub mod types;

pub use control::ControlStateManager;
pub use focus::{FocusResolver, FocusTarget};
pub use gesture::{Dispatched, GestureCallback, GestureCompletion, GestureDispatcher};
pub use manager::{AutomationCore, HostEvent};
pub use session::{AutomationSession, BoundSession, SessionInfo};
pub use text::{Injected, TextInjector};
pub use types::{
    ActionArguments, ControlState, DisplaySize, GestureDescription, GestureId, GestureOutcome,
    GestureRequest, NodeAction, NodeId, NodeInfo, Point, StrokeDescription, CLICK_HOLD,
    SCROLL_TRAVERSE,
};
