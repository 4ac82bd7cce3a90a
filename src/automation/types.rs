use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a click keeps its contact on screen
pub const CLICK_HOLD: Duration = Duration::from_millis(100);

/// How long a scroll takes to travel from start to end
pub const SCROLL_TRAVERSE: Duration = Duration::from_millis(500);

/// Identifier handed back for every accepted gesture
pub type GestureId = String;

/// Stable identifier for an accessibility node (platform-specific)
/// - Windows: UI Automation runtime ID joined with dots
/// - Simulated host: caller-chosen string
pub type NodeId = String;

/// Pixel position on the active display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Size of the display gestures are performed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }
}

/// A gesture the external controller asks for.
///
/// Coordinates are unsigned so negative positions cannot be expressed.
/// Durations are not part of the request; see [`GestureRequest::duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureRequest {
    Click {
        x: u32,
        y: u32,
    },
    Scroll {
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    },
}

impl GestureRequest {
    pub fn click(x: u32, y: u32) -> Self {
        Self::Click { x, y }
    }

    pub fn scroll(start_x: u32, start_y: u32, end_x: u32, end_y: u32) -> Self {
        Self::Scroll {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Scroll { .. } => "scroll",
        }
    }

    /// Fixed duration policy per variant
    pub fn duration(&self) -> Duration {
        match self {
            Self::Click { .. } => CLICK_HOLD,
            Self::Scroll { .. } => SCROLL_TRAVERSE,
        }
    }

    /// Points the single stroke passes through
    pub fn path(&self) -> Vec<Point> {
        match *self {
            Self::Click { x, y } => vec![Point::new(x, y)],
            Self::Scroll {
                start_x,
                start_y,
                end_x,
                end_y,
            } => vec![Point::new(start_x, start_y), Point::new(end_x, end_y)],
        }
    }

    /// Build the stroke description submitted to the host
    pub fn to_description(&self) -> GestureDescription {
        GestureDescription {
            strokes: vec![StrokeDescription::new(self.path(), Duration::ZERO, self.duration())],
        }
    }
}

/// One continuous touch contact: a path plus its timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeDescription {
    pub path: Vec<Point>,
    pub start_time_ms: u64,
    pub duration_ms: u64,
}

impl StrokeDescription {
    pub fn new(path: Vec<Point>, start_time: Duration, duration: Duration) -> Self {
        Self {
            path,
            start_time_ms: start_time.as_millis() as u64,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn start_time(&self) -> Duration {
        Duration::from_millis(self.start_time_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// A path with a single point, i.e. a press-and-hold in place
    pub fn is_stationary(&self) -> bool {
        self.path.windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// A gesture as submitted to the host gesture channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureDescription {
    pub strokes: Vec<StrokeDescription>,
}

impl GestureDescription {
    /// Time from the first stroke starting to the last stroke ending
    pub fn total_duration(&self) -> Duration {
        self.strokes
            .iter()
            .map(|s| s.start_time() + s.duration())
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// Final state of a submitted gesture, as seen by whoever awaits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureOutcome {
    /// The host reports the gesture was performed
    Completed,
    /// The host reports the gesture was interrupted
    Cancelled,
    /// The session went away before the host confirmed anything
    Abandoned,
}

/// Snapshot of an accessibility node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    /// Widget class or control type (e.g. "Edit", "android.widget.EditText")
    pub class_name: Option<String>,
    /// Current text content, when the node exposes one
    pub text: Option<String>,
    pub is_focused: bool,
    pub is_editable: bool,
}

impl NodeInfo {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            class_name: None,
            text: None,
            is_focused: false,
            is_editable: false,
        }
    }

    pub fn focused(mut self) -> Self {
        self.is_focused = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.is_editable = true;
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Eligible as a text injection target
    pub fn accepts_text(&self) -> bool {
        self.is_focused && self.is_editable
    }
}

/// Actions the core asks the host to perform on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NodeAction {
    SetText,
}

/// Parameter bundle passed along with a [`NodeAction`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionArguments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_text: Option<String>,
}

impl ActionArguments {
    pub fn set_text(text: impl Into<String>) -> Self {
        Self {
            set_text: Some(text.into()),
        }
    }
}

/// Whether the external controller currently permits automation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    Enabled,
    #[default]
    Disabled,
}

impl ControlState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_is_stationary_hold() {
        let description = GestureRequest::click(40, 80).to_description();

        assert_eq!(description.strokes.len(), 1);
        let stroke = &description.strokes[0];
        assert_eq!(stroke.path, vec![Point::new(40, 80)]);
        assert!(stroke.is_stationary());
        assert_eq!(stroke.start_time(), Duration::ZERO);
        assert_eq!(stroke.duration(), CLICK_HOLD);
    }

    #[test]
    fn test_scroll_is_two_point_traverse() {
        let description = GestureRequest::scroll(0, 0, 100, 200).to_description();

        let stroke = &description.strokes[0];
        assert_eq!(stroke.path, vec![Point::new(0, 0), Point::new(100, 200)]);
        assert!(!stroke.is_stationary());
        assert_eq!(description.total_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_display_contains() {
        let display = DisplaySize::new(1080, 1920);
        assert!(display.contains(Point::new(0, 0)));
        assert!(display.contains(Point::new(1079, 1919)));
        assert!(!display.contains(Point::new(1080, 10)));
        assert!(!display.contains(Point::new(10, 1920)));
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(GestureRequest::click(1, 2)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "click", "x": 1, "y": 2}));
    }

    #[test]
    fn test_control_state_defaults_disabled() {
        assert_eq!(ControlState::default(), ControlState::Disabled);
        assert!(!ControlState::default().is_enabled());
    }

    #[test]
    fn test_node_eligibility() {
        assert!(!NodeInfo::new("a").editable().accepts_text());
        assert!(!NodeInfo::new("a").focused().accepts_text());
        assert!(NodeInfo::new("a").focused().editable().accepts_text());
    }
}
