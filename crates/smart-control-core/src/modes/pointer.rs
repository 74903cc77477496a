use std::time::Instant;

use smart_control_config::PointerConfig;
use tracing::{debug, info};

use super::{ControlMode, ModeKind};
use crate::action::{ActionEvent, MouseButton};
use crate::features::{FeatureExtractor, Finger};
use crate::gesture::{classify_pinch, PinchState};
use crate::landmark::LandmarkFrame;
use crate::machines::{DragMachine, RateGate};
use crate::stabilizer::{LabelDebouncer, PositionSmoother};

/// Map a normalized fingertip position onto the normalized screen.
///
/// The edge margin is trimmed from every side first, then the result is
/// scaled by `sensitivity` about the centre and clamped to `[0, 1]`.
pub fn map_to_screen(x: f32, y: f32, edge_margin: f32, sensitivity: f32) -> (f32, f32) {
    let axis = |v: f32| {
        let trimmed = ((v - edge_margin) / (1.0 - 2.0 * edge_margin)).clamp(0.0, 1.0);
        ((trimmed - 0.5) * sensitivity + 0.5).clamp(0.0, 1.0)
    };
    (axis(x), axis(y))
}

/// Fires once on the rising edge of a pinch, rate limited.
#[derive(Debug, Clone)]
struct OnsetTrigger {
    gate: RateGate,
    active: bool,
}

impl OnsetTrigger {
    fn new(gate: RateGate) -> Self {
        Self {
            gate,
            active: false,
        }
    }

    fn update(&mut self, pinched: bool, now: Instant) -> bool {
        let onset = pinched && !self.active;
        self.active = pinched;
        onset && self.gate.try_fire(now)
    }

    fn reset(&mut self) {
        self.active = false;
    }
}

/// Index-finger cursor with pinch clicks and drags.
pub struct PointerMode {
    extractor: FeatureExtractor,
    pinch_threshold: f32,
    edge_margin: f32,
    sensitivity: f32,
    smoother: PositionSmoother,
    pinch: LabelDebouncer<PinchState>,
    /// Last unanimous pinch state, kept while the window is mixed
    pinched: bool,
    drag: DragMachine,
    right_click: OnsetTrigger,
    double_click: OnsetTrigger,
}

impl PointerMode {
    pub fn new(config: &PointerConfig) -> Self {
        info!(
            "Pointer mode: pinch threshold {}, drag after {:?}",
            config.pinch_threshold,
            config.drag_hold_time()
        );
        Self {
            extractor: FeatureExtractor::default(),
            pinch_threshold: config.pinch_threshold,
            edge_margin: config.edge_margin,
            sensitivity: config.sensitivity,
            smoother: PositionSmoother::new(config.smoothing_window),
            pinch: LabelDebouncer::new(config.pinch_window),
            pinched: false,
            drag: DragMachine::new(
                MouseButton::Left,
                config.drag_hold_time(),
                config.click_debounce(),
            ),
            right_click: OnsetTrigger::new(RateGate::new(config.click_debounce())),
            double_click: OnsetTrigger::new(RateGate::new(config.double_click_debounce())),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}

impl ControlMode for PointerMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Mouse
    }

    fn on_frame(&mut self, frame: &LandmarkFrame, now: Instant, out: &mut Vec<ActionEvent>) {
        let features = self.extractor.extract(frame);

        if features.fingers.is_extended(Finger::Index) {
            let tip = features.index_tip;
            let (tx, ty) = map_to_screen(tip.x, tip.y, self.edge_margin, self.sensitivity);
            let (x, y) = self.smoother.push(tx, ty);
            out.push(ActionEvent::MoveCursor { x, y });
        }

        let raw = classify_pinch(features.thumb_index, self.pinch_threshold);
        if let Some(state) = self.pinch.push(Some(raw)) {
            self.pinched = state == PinchState::Active;
        }
        out.extend(self.drag.update(self.pinched, now));

        let right = features.thumb_middle < self.pinch_threshold;
        if self.right_click.update(right, now) {
            debug!("Right click");
            out.push(ActionEvent::Click {
                button: MouseButton::Right,
            });
        }

        let double = features.index_ring < self.pinch_threshold;
        if self.double_click.update(double, now) {
            debug!("Double click");
            out.push(ActionEvent::DoubleClick);
        }
    }

    fn on_hand_lost(&mut self, _now: Instant, out: &mut Vec<ActionEvent>) {
        self.smoother.clear();
        self.pinch.clear();
        self.pinched = false;
        self.right_click.reset();
        self.double_click.reset();
        out.extend(self.drag.hand_lost());
    }

    fn shutdown(&mut self, out: &mut Vec<ActionEvent>) {
        out.extend(self.drag.release());
    }
}
