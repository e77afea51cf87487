//! Outbound gesture events.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic gesture recognized from a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Single tap
    Tap,
    /// Secondary (barrel button or press-and-hold) tap
    RightTap,
    /// Press-and-hold began
    HoldEnter,
    /// Press-and-hold ended
    HoldLeave,
    /// Contact moved past the drag threshold
    Drag,
    /// Drag that started from a hold
    RightDrag,
    /// Fast straight stroke
    Flick,
    /// Pen started hovering
    HoverEnter,
    /// Pen stopped hovering
    HoverLeave,
}

impl GestureKind {
    /// Returns `true` for both drag variants.
    #[must_use]
    pub const fn is_drag(self) -> bool {
        matches!(self, Self::Drag | Self::RightDrag)
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tap => "tap",
            Self::RightTap => "right_tap",
            Self::HoldEnter => "hold_enter",
            Self::HoldLeave => "hold_leave",
            Self::Drag => "drag",
            Self::RightDrag => "right_drag",
            Self::Flick => "flick",
            Self::HoverEnter => "hover_enter",
            Self::HoverLeave => "hover_leave",
        };
        f.write_str(name)
    }
}

/// A single recognized gesture, delivered upward one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// Gesture token.
    pub kind: GestureKind,
    /// Location in device units.
    pub position: Point,
    /// Tick count of the sample that produced the gesture.
    pub timestamp: u32,
}

impl GestureEvent {
    /// Create a new gesture event.
    #[must_use]
    pub const fn new(kind: GestureKind, position: Point, timestamp: u32) -> Self {
        Self {
            kind,
            position,
            timestamp,
        }
    }
}
