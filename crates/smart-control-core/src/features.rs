//! Geometric feature extraction
//!
//! Converts a [`LandmarkFrame`] into a [`FeatureVector`]: which fingers are
//! extended, how far each fingertip sits above its reference joint, and the
//! fingertip distances the pinch gestures are built on. Everything is in
//! normalized frame coordinates, so thresholds do not depend on camera
//! resolution (they do depend on how far the hand is from the camera).

use smart_control_config::ThumbRule;

use crate::landmark::{HandLandmark, Handedness, Landmark, LandmarkFrame};

/// The five fingers, thumb first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// Joint the tip is compared against: the IP joint for the thumb, the PIP
    /// joint for the others.
    pub fn reference_joint(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbIp,
            Finger::Index => HandLandmark::IndexPip,
            Finger::Middle => HandLandmark::MiddlePip,
            Finger::Ring => HandLandmark::RingPip,
            Finger::Pinky => HandLandmark::PinkyPip,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Extended flag per finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    /// Flags in thumb, index, middle, ring, pinky order.
    pub const fn new(flags: [bool; 5]) -> Self {
        Self(flags)
    }

    /// Shorthand for tables: `FingerStates::pattern([0, 1, 1, 0, 0])`.
    pub const fn pattern(bits: [u8; 5]) -> Self {
        Self([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger.slot()]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }
}

/// Per-frame geometric features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub fingers: FingerStates,
    /// Reference joint y minus tip y, per finger; positive means the tip is
    /// above the joint in the image
    pub lift: [f32; 5],
    pub thumb_index: f32,
    pub thumb_middle: f32,
    pub index_ring: f32,
    pub index_tip: Landmark,
}

impl FeatureVector {
    pub fn lift(&self, finger: Finger) -> f32 {
        self.lift[finger.slot()]
    }
}

/// Stateless extractor, configured with how the thumb is judged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    thumb_rule: ThumbRule,
}

impl FeatureExtractor {
    pub fn new(thumb_rule: ThumbRule) -> Self {
        Self { thumb_rule }
    }

    pub fn extract(&self, frame: &LandmarkFrame) -> FeatureVector {
        let mut lift = [0.0; 5];
        let mut flags = [false; 5];

        for finger in Finger::ALL {
            let tip = frame.point(finger.tip());
            let joint = frame.point(finger.reference_joint());
            lift[finger.slot()] = joint.y - tip.y;
            flags[finger.slot()] = match finger {
                Finger::Thumb => self.thumb_extended(frame),
                _ => tip.y < joint.y,
            };
        }

        FeatureVector {
            fingers: FingerStates::new(flags),
            lift,
            thumb_index: frame.distance(HandLandmark::ThumbTip, HandLandmark::IndexTip),
            thumb_middle: frame.distance(HandLandmark::ThumbTip, HandLandmark::MiddleTip),
            index_ring: frame.distance(HandLandmark::IndexTip, HandLandmark::RingTip),
            index_tip: frame.point(HandLandmark::IndexTip),
        }
    }

    /// Horizontal tip-vs-IP test, mirrored between hands.
    fn thumb_extended(&self, frame: &LandmarkFrame) -> bool {
        let side = match self.thumb_rule {
            ThumbRule::Right => Some(Handedness::Right),
            ThumbRule::Left => Some(Handedness::Left),
            ThumbRule::Handedness => frame.handedness(),
        };
        let tip = frame.point(HandLandmark::ThumbTip);
        let ip = frame.point(HandLandmark::ThumbIp);
        match side {
            Some(Handedness::Right) => tip.x < ip.x,
            Some(Handedness::Left) => tip.x > ip.x,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::HandPose;

    #[test]
    fn test_extended_fingers_from_pose() {
        let frame = HandPose::open_palm().with_fingers([0, 1, 1, 0, 0]).to_frame();
        let features = FeatureExtractor::new(ThumbRule::Right).extract(&frame);
        assert_eq!(features.fingers, FingerStates::pattern([0, 1, 1, 0, 0]));
        assert!(features.lift(Finger::Index) > 0.0);
        assert!(features.lift(Finger::Ring) < 0.0);
    }

    #[test]
    fn test_thumb_direction_follows_handedness() {
        let right = HandPose::open_palm()
            .with_fingers([1, 0, 0, 0, 0])
            .with_handedness(Some(Handedness::Right))
            .to_frame();
        let left = HandPose::open_palm()
            .with_fingers([1, 0, 0, 0, 0])
            .with_handedness(Some(Handedness::Left))
            .to_frame();

        let extractor = FeatureExtractor::new(ThumbRule::Handedness);
        assert!(extractor.extract(&right).fingers.is_extended(Finger::Thumb));
        assert!(extractor.extract(&left).fingers.is_extended(Finger::Thumb));

        // A fixed rule reads the mirrored thumb as curled
        let fixed = FeatureExtractor::new(ThumbRule::Right);
        assert!(!fixed.extract(&left).fingers.is_extended(Finger::Thumb));
    }

    #[test]
    fn test_unlabeled_hand_never_reports_thumb() {
        let frame = HandPose::open_palm()
            .with_fingers([1, 1, 1, 1, 1])
            .with_handedness(None)
            .to_frame();
        let features = FeatureExtractor::new(ThumbRule::Handedness).extract(&frame);
        assert!(!features.fingers.is_extended(Finger::Thumb));
        assert_eq!(features.fingers.count(), 4);
    }

    #[test]
    fn test_pinch_distances() {
        let frame = HandPose::open_palm().pinching().to_frame();
        let features = FeatureExtractor::default().extract(&frame);
        assert!(features.thumb_index < 0.03);
        assert!(features.thumb_middle > 0.03);
        assert!(features.index_ring > 0.03);
    }
}
