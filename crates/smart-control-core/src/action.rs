//! Actions sent to the output actuator

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
}

/// Keys the control modes can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Space,
    F5,
    Escape,
    MediaNextTrack,
    MediaPreviousTrack,
    MediaPlayPause,
    VolumeUp,
    VolumeDown,
}

/// A discrete instruction for the actuator.
///
/// Cursor coordinates and volume levels are normalized to `[0, 1]`; the
/// actuator scales them to the screen or the audio endpoint's range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionEvent {
    MoveCursor { x: f32, y: f32 },
    MouseDown { button: MouseButton },
    MouseUp { button: MouseButton },
    Click { button: MouseButton },
    DoubleClick,
    KeyPress { key: Key },
    SetVolumeLevel { level: f32 },
}

impl ActionEvent {
    /// Whether this event changes a held-button state
    pub fn is_button_edge(&self) -> bool {
        matches!(
            self,
            ActionEvent::MouseDown { .. } | ActionEvent::MouseUp { .. }
        )
    }
}

impl fmt::Display for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionEvent::MoveCursor { x, y } => write!(f, "move cursor to ({:.3}, {:.3})", x, y),
            ActionEvent::MouseDown { button } => write!(f, "{:?} button down", button),
            ActionEvent::MouseUp { button } => write!(f, "{:?} button up", button),
            ActionEvent::Click { button } => write!(f, "{:?} click", button),
            ActionEvent::DoubleClick => write!(f, "double click"),
            ActionEvent::KeyPress { key } => write!(f, "press {:?}", key),
            ActionEvent::SetVolumeLevel { level } => write!(f, "set volume to {:.0}%", level * 100.0),
        }
    }
}
