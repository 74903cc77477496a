//! Gesture classification
//!
//! Pure functions from a [`FeatureVector`] to a mode-specific label. "No
//! recognized gesture" is `None`; every label set is a closed enum so the
//! mode pipelines match on it exhaustively.

use std::fmt::Debug;

use crate::features::{FeatureVector, Finger, FingerStates};

/// Marker for label enums that can flow through the stabilizer and the
/// hold-to-confirm machine.
pub trait GestureLabel: Copy + Eq + Debug + Send + Sync + 'static {
    fn name(&self) -> &'static str;
}

/// Presentation-style navigation gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationGesture {
    Next,
    Previous,
    Start,
    Exit,
    Fist,
}

impl GestureLabel for NavigationGesture {
    fn name(&self) -> &'static str {
        match self {
            NavigationGesture::Next => "next",
            NavigationGesture::Previous => "previous",
            NavigationGesture::Start => "start",
            NavigationGesture::Exit => "exit",
            NavigationGesture::Fist => "fist",
        }
    }
}

/// Extended-finger counts used by the keyboard and media modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountGesture {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl GestureLabel for CountGesture {
    fn name(&self) -> &'static str {
        match self {
            CountGesture::One => "one",
            CountGesture::Two => "two",
            CountGesture::Three => "three",
            CountGesture::Four => "four",
            CountGesture::Five => "five",
        }
    }
}

/// Raw pinch edge state, `distance < threshold` with no hysteresis band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinchState {
    Active,
    Released,
}

impl GestureLabel for PinchState {
    fn name(&self) -> &'static str {
        match self {
            PinchState::Active => "pinch",
            PinchState::Released => "release",
        }
    }
}

/// Volume mode gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeGesture {
    Peace,
    ThumbsUp,
}

impl GestureLabel for VolumeGesture {
    fn name(&self) -> &'static str {
        match self {
            VolumeGesture::Peace => "peace",
            VolumeGesture::ThumbsUp => "thumbs_up",
        }
    }
}

/// Exact-match table from finger patterns to labels.
#[derive(Debug, Clone, Copy)]
pub struct GestureTable<L: 'static> {
    entries: &'static [(FingerStates, L)],
}

impl<L: GestureLabel> GestureTable<L> {
    pub const fn new(entries: &'static [(FingerStates, L)]) -> Self {
        Self { entries }
    }

    /// Label for an exact pattern match; anything else is `None`
    pub fn classify(&self, fingers: FingerStates) -> Option<L> {
        self.entries
            .iter()
            .find(|(pattern, _)| *pattern == fingers)
            .map(|(_, label)| *label)
    }
}

pub const NAVIGATION_TABLE: GestureTable<NavigationGesture> = GestureTable::new(&[
    (FingerStates::pattern([0, 1, 0, 0, 0]), NavigationGesture::Next),
    (FingerStates::pattern([0, 1, 1, 0, 0]), NavigationGesture::Previous),
    (FingerStates::pattern([0, 1, 1, 1, 0]), NavigationGesture::Start),
    (FingerStates::pattern([1, 0, 0, 0, 0]), NavigationGesture::Exit),
    (FingerStates::pattern([0, 0, 0, 0, 0]), NavigationGesture::Fist),
]);

pub const COUNT_TABLE: GestureTable<CountGesture> = GestureTable::new(&[
    (FingerStates::pattern([0, 1, 0, 0, 0]), CountGesture::One),
    (FingerStates::pattern([0, 1, 1, 0, 0]), CountGesture::Two),
    (FingerStates::pattern([0, 1, 1, 1, 0]), CountGesture::Three),
    (FingerStates::pattern([0, 1, 1, 1, 1]), CountGesture::Four),
    (FingerStates::pattern([1, 1, 1, 1, 1]), CountGesture::Five),
]);

pub fn classify_pinch(distance: f32, threshold: f32) -> PinchState {
    if distance < threshold {
        PinchState::Active
    } else {
        PinchState::Released
    }
}

/// Vertical-lift margins for the volume gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMargins {
    pub finger: f32,
    pub thumb: f32,
}

/// Peace sign takes precedence over thumbs-up; neither is `None`.
pub fn classify_volume(features: &FeatureVector, margins: VolumeMargins) -> Option<VolumeGesture> {
    let curled = |finger: Finger| features.lift(finger) < 0.0;

    let peace = features.lift(Finger::Index) > margins.finger
        && features.lift(Finger::Middle) > margins.finger
        && curled(Finger::Ring)
        && curled(Finger::Pinky);
    if peace {
        return Some(VolumeGesture::Peace);
    }

    let thumbs_up = features.lift(Finger::Thumb) > margins.thumb
        && curled(Finger::Index)
        && curled(Finger::Middle)
        && curled(Finger::Ring)
        && curled(Finger::Pinky);
    thumbs_up.then_some(VolumeGesture::ThumbsUp)
}
