//! Hand landmark frames
//!
//! A [`LandmarkFrame`] is one detection result for a single hand: 21 points
//! in the standard hand topology, x/y normalized to the camera frame (y grows
//! downwards) and z a relative depth.

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Number of landmarks in a tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// A single tracked point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane (x, y only)
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(p: Landmark) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Named landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which hand the detector reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame", into = "RawFrame")]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
    handedness: Option<Handedness>,
}

impl LandmarkFrame {
    /// Build a frame, rejecting anything other than exactly 21 points.
    pub fn new(points: Vec<Landmark>, handedness: Option<Handedness>) -> Result<Self, FrameError> {
        let actual = points.len();
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| FrameError::WrongPointCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;
        Ok(Self { points, handedness })
    }

    pub fn from_points(points: [Landmark; LANDMARK_COUNT], handedness: Option<Handedness>) -> Self {
        Self { points, handedness }
    }

    pub fn point(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    /// Planar distance between two named landmarks
    pub fn distance(&self, a: HandLandmark, b: HandLandmark) -> f32 {
        self.point(a).planar_distance(&self.point(b))
    }
}

#[derive(Serialize, Deserialize)]
struct RawFrame {
    points: Vec<Landmark>,
    #[serde(default)]
    handedness: Option<Handedness>,
}

impl TryFrom<RawFrame> for LandmarkFrame {
    type Error = FrameError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        LandmarkFrame::new(raw.points, raw.handedness)
    }
}

impl From<LandmarkFrame> for RawFrame {
    fn from(frame: LandmarkFrame) -> Self {
        RawFrame {
            points: frame.points.to_vec(),
            handedness: frame.handedness,
        }
    }
}
