use std::time::Instant;

use smart_control_config::VolumeConfig;
use tracing::{debug, info};

use super::{ControlMode, ModeKind};
use crate::action::ActionEvent;
use crate::features::FeatureExtractor;
use crate::gesture::{classify_volume, VolumeGesture, VolumeMargins};
use crate::landmark::LandmarkFrame;
use crate::machines::{LockMachine, LockTransition};

/// Linear map of a thumb-index span onto `[0, 1]`, quantized to `step`.
pub fn span_to_level(span: f32, min_span: f32, max_span: f32, step: f32) -> f32 {
    let t = ((span - min_span) / (max_span - min_span)).clamp(0.0, 1.0);
    ((t / step).round() * step).clamp(0.0, 1.0)
}

/// Thumb-index span volume control with a peace-sign lock.
pub struct VolumeMode {
    extractor: FeatureExtractor,
    margins: VolumeMargins,
    min_span: f32,
    max_span: f32,
    step: f32,
    /// Captures the last emitted level; `None` until one is known
    lock: LockMachine<Option<f32>>,
    level: Option<f32>,
}

impl VolumeMode {
    pub fn new(config: &VolumeConfig) -> Self {
        info!(
            "Volume mode: span [{}, {}], step {}, lock after {} frames",
            config.min_span, config.max_span, config.step, config.lock_trigger_frames
        );
        Self {
            extractor: FeatureExtractor::default(),
            margins: VolumeMargins {
                finger: config.gesture_margin,
                thumb: config.thumb_margin,
            },
            min_span: config.min_span,
            max_span: config.max_span,
            step: config.step,
            lock: LockMachine::new(config.lock_trigger_frames, config.lock_cooldown_frames),
            level: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Last level sent to the actuator
    pub fn level(&self) -> Option<f32> {
        self.level
    }

    fn set_level(&mut self, level: f32, out: &mut Vec<ActionEvent>) {
        if self.level == Some(level) {
            return;
        }
        debug!("Volume level {:.2}", level);
        self.level = Some(level);
        out.push(ActionEvent::SetVolumeLevel { level });
    }
}

impl ControlMode for VolumeMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Volume
    }

    fn on_frame(&mut self, frame: &LandmarkFrame, _now: Instant, out: &mut Vec<ActionEvent>) {
        let features = self.extractor.extract(frame);
        let gesture = classify_volume(&features, self.margins);

        match self.lock.update(gesture == Some(VolumeGesture::Peace), self.level) {
            Some(LockTransition::Locked(level)) => info!("Volume locked at {:?}", level),
            Some(LockTransition::Unlocked) => info!("Volume unlocked"),
            None => {}
        }

        let locked = self.lock.is_locked();
        let target = match gesture {
            Some(VolumeGesture::ThumbsUp) if !locked => Some(1.0),
            Some(_) => None,
            None if locked => self.lock.locked_value().flatten(),
            None => Some(span_to_level(
                features.thumb_index,
                self.min_span,
                self.max_span,
                self.step,
            )),
        };

        if let Some(level) = target {
            self.set_level(level, out);
        }
    }

    fn on_hand_lost(&mut self, _now: Instant, _out: &mut Vec<ActionEvent>) {
        self.lock.hand_lost();
    }

    fn shutdown(&mut self, _out: &mut Vec<ActionEvent>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::HandPose;

    fn levels(events: &[ActionEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                ActionEvent::SetVolumeLevel { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_span_to_level() {
        assert_eq!(span_to_level(0.0, 0.06, 0.34, 0.05), 0.0);
        assert_eq!(span_to_level(0.5, 0.06, 0.34, 0.05), 1.0);
        assert!(approx(span_to_level(0.20, 0.06, 0.34, 0.05), 0.5));
        // 0.857 quantizes down to 0.85
        assert!(approx(span_to_level(0.30, 0.06, 0.34, 0.05), 0.85));
    }

    #[test]
    fn test_level_emitted_only_on_change() {
        let mut mode = VolumeMode::new(&VolumeConfig::default());
        let t0 = Instant::now();
        let frame = HandPose::pointing().with_span(0.2).to_frame();

        let mut events = mode.step(Some(&frame), t0);
        events.extend(mode.step(Some(&frame), t0));
        let emitted = levels(&events);
        assert_eq!(emitted.len(), 1);
        assert!(approx(emitted[0], 0.5));
    }

    #[test]
    fn test_thumbs_up_sets_maximum() {
        let mut mode = VolumeMode::new(&VolumeConfig::default());
        let events = mode.step(Some(&HandPose::thumbs_up().to_frame()), Instant::now());
        assert_eq!(levels(&events), vec![1.0]);
    }

    #[test]
    fn test_lock_holds_level_until_unlocked() {
        let config = VolumeConfig {
            lock_trigger_frames: 3,
            lock_cooldown_frames: 2,
            ..VolumeConfig::default()
        };
        let mut mode = VolumeMode::new(&config);
        let t0 = Instant::now();
        let half = HandPose::pointing().with_span(0.2).to_frame();
        let wide = HandPose::pointing().with_span(0.3).to_frame();
        let peace = HandPose::peace().to_frame();
        let thumbs_up = HandPose::thumbs_up().to_frame();

        let mut events = mode.step(Some(&half), t0);
        for _ in 0..3 {
            events.extend(mode.step(Some(&peace), t0));
        }
        assert!(mode.is_locked());

        // Locked: neither the span nor thumbs-up moves the level
        events.extend(mode.step(Some(&wide), t0));
        events.extend(mode.step(Some(&thumbs_up), t0));
        assert_eq!(levels(&events).len(), 1);

        for _ in 0..3 {
            events.extend(mode.step(Some(&peace), t0));
        }
        assert!(!mode.is_locked());

        events.extend(mode.step(Some(&wide), t0));
        let emitted = levels(&events);
        assert_eq!(emitted.len(), 2);
        assert!(approx(emitted[1], 0.85));
    }

    #[test]
    fn test_hand_lost_abandons_lock_count() {
        let config = VolumeConfig {
            lock_trigger_frames: 3,
            ..VolumeConfig::default()
        };
        let mut mode = VolumeMode::new(&config);
        let t0 = Instant::now();
        let peace = HandPose::peace().to_frame();

        mode.step(Some(&peace), t0);
        mode.step(Some(&peace), t0);
        assert!(mode.step(None, t0).is_empty());
        mode.step(Some(&peace), t0);
        assert!(!mode.is_locked());
    }
}
