//! Synthetic hand generation for development without a camera
//!
//! [`HandPose`] builds a plausible 21-point [`LandmarkFrame`] from a
//! high-level description (which fingers are up, which fingertips touch,
//! where the wrist is). [`HandSimulator`] drives a pose from keyboard input so
//! every control mode can be exercised from a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::landmark::{HandLandmark, Handedness, Landmark, LandmarkFrame, LANDMARK_COUNT};

/// Fingertip pairs that can be pinched together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchPair {
    ThumbIndex,
    ThumbMiddle,
    IndexRing,
}

const PINCH_GAP: f32 = 0.005;
const FINGER_SPACING: f32 = 0.045;

/// Declarative description of a hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    /// Wrist position (normalized)
    pub wrist: (f32, f32),
    /// Extended flags, thumb first
    pub fingers: [bool; 5],
    pub handedness: Option<Handedness>,
    pub thumbs_up: bool,
    pub pinch: Option<PinchPair>,
    /// Explicit thumb-index gap, thumb tip placed straight below the index tip
    pub span: Option<f32>,
}

impl Default for HandPose {
    fn default() -> Self {
        Self {
            wrist: (0.5, 0.7),
            fingers: [false; 5],
            handedness: Some(Handedness::Right),
            thumbs_up: false,
            pinch: None,
            span: None,
        }
    }
}

impl HandPose {
    /// A closed fist
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_palm() -> Self {
        Self::new().with_fingers([1, 1, 1, 1, 1])
    }

    pub fn pointing() -> Self {
        Self::new().with_fingers([0, 1, 0, 0, 0])
    }

    pub fn peace() -> Self {
        Self::new().with_fingers([0, 1, 1, 0, 0])
    }

    pub fn thumbs_up() -> Self {
        Self {
            thumbs_up: true,
            ..Self::new()
        }
    }

    pub fn with_fingers(mut self, bits: [u8; 5]) -> Self {
        self.fingers = bits.map(|b| b != 0);
        self
    }

    pub fn with_handedness(mut self, handedness: Option<Handedness>) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.wrist = (x, y);
        self
    }

    pub fn with_pinch(mut self, pair: PinchPair) -> Self {
        self.pinch = Some(pair);
        self
    }

    pub fn pinching(self) -> Self {
        self.with_pinch(PinchPair::ThumbIndex)
    }

    pub fn with_span(mut self, span: f32) -> Self {
        self.span = Some(span);
        self
    }

    /// Build the 21-point frame.
    pub fn to_frame(&self) -> LandmarkFrame {
        let (cx, cy) = self.wrist;
        // Thumb side: -x for a right hand in the mirrored image
        let t = match self.handedness {
            Some(Handedness::Left) => 1.0,
            _ => -1.0,
        };
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        let mut set = |id: HandLandmark, x: f32, y: f32| {
            points[id.index()] = Landmark::new(x, y, 0.0);
        };

        set(HandLandmark::Wrist, cx, cy);

        let columns = [
            (HandLandmark::IndexMcp, t * FINGER_SPACING, self.fingers[1]),
            (HandLandmark::MiddleMcp, 0.0, self.fingers[2]),
            (HandLandmark::RingMcp, -t * FINGER_SPACING, self.fingers[3]),
            (HandLandmark::PinkyMcp, -t * 2.0 * FINGER_SPACING, self.fingers[4]),
        ];
        for (mcp, dx, extended) in columns {
            let base = mcp.index();
            let x = cx + dx;
            let (dip_y, tip_y) = if extended {
                (cy - 0.17, cy - 0.20)
            } else {
                (cy - 0.12, cy - 0.10)
            };
            points[base] = Landmark::new(x, cy - 0.10, 0.0);
            points[base + 1] = Landmark::new(x, cy - 0.14, 0.0);
            points[base + 2] = Landmark::new(x, dip_y, 0.0);
            points[base + 3] = Landmark::new(x, tip_y, 0.0);
        }

        let mut set = |id: HandLandmark, x: f32, y: f32| {
            points[id.index()] = Landmark::new(x, y, 0.0);
        };
        set(HandLandmark::ThumbCmc, cx + t * 0.03, cy - 0.03);
        if self.thumbs_up {
            set(HandLandmark::ThumbMcp, cx + t * 0.06, cy - 0.06);
            set(HandLandmark::ThumbIp, cx + t * 0.06, cy - 0.10);
            set(HandLandmark::ThumbTip, cx + t * 0.06, cy - 0.18);
        } else {
            set(HandLandmark::ThumbMcp, cx + t * 0.06, cy - 0.06);
            set(HandLandmark::ThumbIp, cx + t * 0.08, cy - 0.08);
            if self.fingers[0] {
                set(HandLandmark::ThumbTip, cx + t * 0.11, cy - 0.09);
            } else {
                set(HandLandmark::ThumbTip, cx + t * 0.05, cy - 0.08);
            }
        }

        let touch = |target: Landmark| Landmark::new(target.x, target.y + PINCH_GAP, 0.0);
        match self.pinch {
            Some(PinchPair::ThumbIndex) => {
                points[HandLandmark::ThumbTip.index()] = touch(points[HandLandmark::IndexTip.index()]);
            }
            Some(PinchPair::ThumbMiddle) => {
                points[HandLandmark::ThumbTip.index()] = touch(points[HandLandmark::MiddleTip.index()]);
            }
            Some(PinchPair::IndexRing) => {
                points[HandLandmark::RingTip.index()] = touch(points[HandLandmark::IndexTip.index()]);
            }
            None => {
                if let Some(span) = self.span {
                    let index = points[HandLandmark::IndexTip.index()];
                    points[HandLandmark::ThumbTip.index()] = Landmark::new(index.x, index.y + span, 0.0);
                }
            }
        }

        LandmarkFrame::from_points(points, self.handedness)
    }
}

/// Result of feeding a key to the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimInput {
    Updated,
    Quit,
    Ignored,
}

/// Keyboard-driven hand for terminal development.
///
/// | Key | Effect |
/// |---|---|
/// | arrows | move the hand |
/// | `0`-`5` | extended-finger count (`5` = open palm) |
/// | `t` | thumb only |
/// | `v` | peace sign |
/// | `u` | toggle thumbs-up |
/// | `p` / `m` / `r` | toggle thumb-index / thumb-middle / index-ring pinch |
/// | `[` / `]` | shrink / widen the thumb-index span |
/// | `h` | toggle hand presence |
/// | `q` / Esc | quit |
pub struct HandSimulator {
    pose: HandPose,
    present: bool,
    move_speed: f32,
    span_step: f32,
}

impl Default for HandSimulator {
    fn default() -> Self {
        Self {
            pose: HandPose::pointing(),
            present: true,
            move_speed: 0.02,
            span_step: 0.02,
        }
    }
}

impl HandSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> &HandPose {
        &self.pose
    }

    /// Current frame, or `None` while the hand is hidden
    pub fn frame(&self) -> Option<LandmarkFrame> {
        self.present.then(|| self.pose.to_frame())
    }

    pub fn process_key(&mut self, key: KeyEvent) -> SimInput {
        if key.kind != KeyEventKind::Press {
            return SimInput::Ignored;
        }

        let (x, y) = self.pose.wrist;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return SimInput::Quit,

            KeyCode::Up => self.pose.wrist = (x, (y - self.move_speed).max(0.0)),
            KeyCode::Down => self.pose.wrist = (x, (y + self.move_speed).min(1.0)),
            KeyCode::Left => self.pose.wrist = ((x - self.move_speed).max(0.0), y),
            KeyCode::Right => self.pose.wrist = ((x + self.move_speed).min(1.0), y),

            KeyCode::Char(c @ '0'..='5') => {
                self.pose.thumbs_up = false;
                self.pose.fingers = match c {
                    '0' => [false; 5],
                    '1' => [false, true, false, false, false],
                    '2' => [false, true, true, false, false],
                    '3' => [false, true, true, true, false],
                    '4' => [false, true, true, true, true],
                    _ => [true; 5],
                };
            }
            KeyCode::Char('t') => {
                self.pose.thumbs_up = false;
                self.pose.fingers = [true, false, false, false, false];
            }
            KeyCode::Char('v') => {
                self.pose.thumbs_up = false;
                self.pose.fingers = [false, true, true, false, false];
            }
            KeyCode::Char('u') => {
                self.pose.thumbs_up = !self.pose.thumbs_up;
                if self.pose.thumbs_up {
                    self.pose.fingers = [false; 5];
                }
            }

            KeyCode::Char('p') => self.toggle_pinch(PinchPair::ThumbIndex),
            KeyCode::Char('m') => self.toggle_pinch(PinchPair::ThumbMiddle),
            KeyCode::Char('r') => self.toggle_pinch(PinchPair::IndexRing),

            KeyCode::Char('[') => {
                let span = self.pose.span.unwrap_or(0.2);
                self.pose.span = Some((span - self.span_step).max(0.0));
            }
            KeyCode::Char(']') => {
                let span = self.pose.span.unwrap_or(0.2);
                self.pose.span = Some((span + self.span_step).min(0.5));
            }

            KeyCode::Char('h') => self.present = !self.present,

            _ => return SimInput::Ignored,
        }
        SimInput::Updated
    }

    fn toggle_pinch(&mut self, pair: PinchPair) {
        self.pose.pinch = match self.pose.pinch {
            Some(current) if current == pair => None,
            _ => Some(pair),
        };
    }
}
