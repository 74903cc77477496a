//! Control modes
//!
//! A mode is one complete pipeline: feature extraction, classification,
//! stabilization and its state machines, owning all of its state. Modes are
//! built fresh for every run from [`ModeKind::build`], so two runs never
//! share a buffer or a timer.

mod navigation;
mod pointer;
mod volume;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use smart_control_config::AppConfig;

use crate::action::ActionEvent;
use crate::error::{Result, RunError};
use crate::landmark::LandmarkFrame;

pub use navigation::NavigationMode;
pub use pointer::{map_to_screen, PointerMode};
pub use volume::{span_to_level, VolumeMode};

/// One running control mode.
pub trait ControlMode: Send {
    fn kind(&self) -> ModeKind;

    /// A frame with a hand in it
    fn on_frame(&mut self, frame: &LandmarkFrame, now: Instant, out: &mut Vec<ActionEvent>);

    /// A frame without a hand. In-flight timers and counters reset; a held
    /// button is released.
    fn on_hand_lost(&mut self, now: Instant, out: &mut Vec<ActionEvent>);

    /// Mode teardown. Must release anything still held.
    fn shutdown(&mut self, out: &mut Vec<ActionEvent>);

    /// Convenience wrapper for one pipeline step
    fn step(&mut self, hand: Option<&LandmarkFrame>, now: Instant) -> Vec<ActionEvent> {
        let mut out = Vec::new();
        match hand {
            Some(frame) => self.on_frame(frame, now, &mut out),
            None => self.on_hand_lost(now, &mut out),
        }
        out
    }
}

/// Every supported mode, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Mouse,
    Keyboard,
    Media,
    Volume,
    Presentation,
}

impl ModeKind {
    pub const ALL: [ModeKind; 5] = [
        ModeKind::Mouse,
        ModeKind::Keyboard,
        ModeKind::Media,
        ModeKind::Volume,
        ModeKind::Presentation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModeKind::Mouse => "mouse",
            ModeKind::Keyboard => "keyboard",
            ModeKind::Media => "media",
            ModeKind::Volume => "volume",
            ModeKind::Presentation => "presentation",
        }
    }

    /// Gesture reference shown to the user
    pub fn gesture_help(&self) -> &'static str {
        match self {
            ModeKind::Mouse => {
                "Index finger up        -> move cursor\n\
                 Thumb + index pinch    -> left click (quick) / drag (hold)\n\
                 Thumb + middle pinch   -> right click\n\
                 Index + ring pinch     -> double click"
            }
            ModeKind::Keyboard => {
                "1 finger  -> right arrow\n\
                 2 fingers -> left arrow\n\
                 3 fingers -> up arrow\n\
                 4 fingers -> down arrow\n\
                 5 fingers -> space"
            }
            ModeKind::Media => {
                "1 finger  -> next track\n\
                 2 fingers -> previous track\n\
                 3 fingers -> volume up\n\
                 4 fingers -> volume down\n\
                 5 fingers -> play / pause"
            }
            ModeKind::Volume => {
                "Thumb-index span -> adjust volume\n\
                 Peace sign (hold) -> lock / unlock\n\
                 Thumbs up         -> maximum volume"
            }
            ModeKind::Presentation => {
                "1 finger  -> next slide\n\
                 2 fingers -> previous slide\n\
                 3 fingers -> start presentation\n\
                 Thumb     -> exit presentation\n\
                 Fist      -> exit"
            }
        }
    }

    /// Validate this mode's settings and build a fresh session.
    pub fn build(&self, config: &AppConfig) -> Result<Box<dyn ControlMode>> {
        let mode: Box<dyn ControlMode> = match self {
            ModeKind::Mouse => {
                config.pointer.validate()?;
                Box::new(PointerMode::new(&config.pointer))
            }
            ModeKind::Keyboard => {
                config.navigation.validate()?;
                Box::new(NavigationMode::keyboard(&config.navigation))
            }
            ModeKind::Media => {
                config.navigation.validate()?;
                Box::new(NavigationMode::media(&config.navigation))
            }
            ModeKind::Presentation => {
                config.navigation.validate()?;
                Box::new(NavigationMode::presentation(&config.navigation))
            }
            ModeKind::Volume => {
                config.volume.validate()?;
                Box::new(VolumeMode::new(&config.volume))
            }
        };
        Ok(mode)
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = RunError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ModeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| RunError::UnknownMode(s.to_string()))
    }
}
