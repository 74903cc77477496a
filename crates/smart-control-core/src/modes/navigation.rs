use std::time::Instant;

use smart_control_config::NavigationConfig;
use tracing::info;

use super::{ControlMode, ModeKind};
use crate::action::{ActionEvent, Key};
use crate::features::FeatureExtractor;
use crate::gesture::{
    CountGesture, GestureLabel, GestureTable, NavigationGesture, COUNT_TABLE, NAVIGATION_TABLE,
};
use crate::landmark::LandmarkFrame;
use crate::machines::HoldMachine;
use crate::stabilizer::LabelDebouncer;

fn presentation_key(gesture: NavigationGesture) -> Key {
    match gesture {
        NavigationGesture::Next => Key::ArrowRight,
        NavigationGesture::Previous => Key::ArrowLeft,
        NavigationGesture::Start => Key::F5,
        NavigationGesture::Exit | NavigationGesture::Fist => Key::Escape,
    }
}

fn keyboard_key(gesture: CountGesture) -> Key {
    match gesture {
        CountGesture::One => Key::ArrowRight,
        CountGesture::Two => Key::ArrowLeft,
        CountGesture::Three => Key::ArrowUp,
        CountGesture::Four => Key::ArrowDown,
        CountGesture::Five => Key::Space,
    }
}

fn media_key(gesture: CountGesture) -> Key {
    match gesture {
        CountGesture::One => Key::MediaNextTrack,
        CountGesture::Two => Key::MediaPreviousTrack,
        CountGesture::Three => Key::VolumeUp,
        CountGesture::Four => Key::VolumeDown,
        CountGesture::Five => Key::MediaPlayPause,
    }
}

/// Discrete-gesture mode: table lookup, unanimous debounce, then
/// hold-to-confirm before a single key press.
pub struct NavigationMode<L: GestureLabel> {
    kind: ModeKind,
    extractor: FeatureExtractor,
    table: GestureTable<L>,
    binding: fn(L) -> Key,
    debouncer: LabelDebouncer<L>,
    hold: HoldMachine<L>,
}

impl NavigationMode<NavigationGesture> {
    pub fn presentation(config: &NavigationConfig) -> Self {
        Self::new(ModeKind::Presentation, NAVIGATION_TABLE, presentation_key, config)
    }
}

impl NavigationMode<CountGesture> {
    pub fn keyboard(config: &NavigationConfig) -> Self {
        Self::new(ModeKind::Keyboard, COUNT_TABLE, keyboard_key, config)
    }

    pub fn media(config: &NavigationConfig) -> Self {
        Self::new(ModeKind::Media, COUNT_TABLE, media_key, config)
    }
}

impl<L: GestureLabel> NavigationMode<L> {
    pub fn new(
        kind: ModeKind,
        table: GestureTable<L>,
        binding: fn(L) -> Key,
        config: &NavigationConfig,
    ) -> Self {
        info!(
            "{} mode: hold {:?}, cooldown {:?}, window {} frames",
            kind,
            config.hold_time(),
            config.cooldown_time(),
            config.stabilization_window
        );
        Self {
            kind,
            extractor: FeatureExtractor::new(config.thumb_rule),
            table,
            binding,
            debouncer: LabelDebouncer::new(config.stabilization_window),
            hold: HoldMachine::new(config.hold_time(), config.cooldown_time()),
        }
    }
}

impl<L: GestureLabel> ControlMode for NavigationMode<L> {
    fn kind(&self) -> ModeKind {
        self.kind
    }

    fn on_frame(&mut self, frame: &LandmarkFrame, now: Instant, out: &mut Vec<ActionEvent>) {
        let features = self.extractor.extract(frame);
        let raw = self.table.classify(features.fingers);
        let stable = self.debouncer.push(raw);

        if let Some(gesture) = self.hold.update(stable, now) {
            // A fresh window is required before the next candidate
            self.debouncer.clear();
            let key = (self.binding)(gesture);
            info!("{} gesture {} -> {:?}", self.kind, gesture.name(), key);
            out.push(ActionEvent::KeyPress { key });
        }
    }

    fn on_hand_lost(&mut self, _now: Instant, _out: &mut Vec<ActionEvent>) {
        self.debouncer.clear();
        self.hold.reset();
    }

    fn shutdown(&mut self, _out: &mut Vec<ActionEvent>) {}
}
