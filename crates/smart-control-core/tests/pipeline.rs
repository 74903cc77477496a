//! End-to-end behaviour of the gesture pipeline on synthetic hands.

use std::time::{Duration, Instant};

use smart_control_config::{AppConfig, PointerConfig, VolumeConfig};
use smart_control_core::gesture::PinchState;
use smart_control_core::machines::LockMachine;
use smart_control_core::{
    run, run_mode, ActionEvent, ControlMode, FrameSample, FrameSource, HandPose, Key,
    LabelDebouncer, ModeKind, MouseButton, RecordingDispatcher, ScriptedSource, StopReason,
};
use tokio::sync::watch;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn count(events: &[ActionEvent], wanted: fn(&ActionEvent) -> bool) -> usize {
    events.iter().filter(|e| wanted(e)).count()
}

#[test]
fn drag_is_always_released_on_hand_loss() {
    // Every cut point of a long pinch must leave the button up
    for cut in 1..12u64 {
        let mut mode = ModeKind::Mouse.build(&AppConfig::default()).unwrap();
        let t0 = Instant::now();
        let pinch = HandPose::pointing().pinching().to_frame();

        let mut events = Vec::new();
        for i in 0..cut {
            events.extend(mode.step(Some(&pinch), t0 + ms(i * 33)));
        }
        events.extend(mode.step(None, t0 + ms(cut * 33)));

        let downs = count(&events, |e| matches!(e, ActionEvent::MouseDown { .. }));
        let ups = count(&events, |e| matches!(e, ActionEvent::MouseUp { .. }));
        assert_eq!(downs, ups, "cut after {} frames: {:?}", cut, events);
    }
}

#[test]
fn debouncer_stabilizes_at_window_minus_one() {
    let mut debouncer = LabelDebouncer::new(3);
    let raw = [
        None,
        None,
        Some(PinchState::Active),
        Some(PinchState::Active),
        Some(PinchState::Active),
    ];
    let stable: Vec<_> = raw.iter().map(|label| debouncer.push(*label)).collect();
    assert_eq!(stable, vec![None, None, None, None, Some(PinchState::Active)]);

    for window in 1..8 {
        let mut debouncer = LabelDebouncer::new(window);
        let first = (0..20)
            .map(|_| debouncer.push(Some(PinchState::Released)))
            .position(|s| s.is_some());
        assert_eq!(first, Some(window - 1));
    }
}

#[test]
fn quick_pinches_within_debounce_click_once() {
    let mut mode = ModeKind::Mouse.build(&AppConfig::default()).unwrap();
    let t0 = Instant::now();
    let pinch = HandPose::pointing().pinching().to_frame();
    let open = HandPose::pointing().to_frame();

    let mut events = Vec::new();
    for (t, frame) in [(0, &pinch), (50, &open), (100, &pinch), (150, &open)] {
        events.extend(mode.step(Some(frame), t0 + ms(t)));
    }
    let clicks = count(&events, |e| matches!(e, ActionEvent::Click { .. }));
    assert_eq!(clicks, 1);
}

#[test]
fn pinch_held_past_drag_time_drags_without_click() {
    let config = AppConfig {
        pointer: PointerConfig {
            drag_hold_time: 0.15,
            ..PointerConfig::default()
        },
        ..AppConfig::default()
    };
    let mut mode = ModeKind::Mouse.build(&config).unwrap();
    let t0 = Instant::now();
    let pinch = HandPose::pointing().pinching().to_frame();
    let open = HandPose::pointing().to_frame();

    let mut events = Vec::new();
    for t in [0, 100, 200] {
        events.extend(mode.step(Some(&pinch), t0 + ms(t)));
    }
    events.extend(mode.step(Some(&open), t0 + ms(233)));

    let buttons: Vec<_> = events
        .into_iter()
        .filter(|e| !matches!(e, ActionEvent::MoveCursor { .. }))
        .collect();
    assert_eq!(
        buttons,
        vec![
            ActionEvent::MouseDown {
                button: MouseButton::Left
            },
            ActionEvent::MouseUp {
                button: MouseButton::Left
            },
        ]
    );
}

#[test]
fn held_gesture_fires_once_through_cooldown() {
    let mut mode = ModeKind::Presentation.build(&AppConfig::default()).unwrap();
    let t0 = Instant::now();
    let next = HandPose::pointing().to_frame();

    // Stable from 100 ms, hold 1 s, then cooldown
    let mut presses = Vec::new();
    for t in (0..=2000).step_by(25) {
        for event in mode.step(Some(&next), t0 + ms(t)) {
            presses.push((t, event));
        }
    }
    assert_eq!(
        presses,
        vec![(1100, ActionEvent::KeyPress { key: Key::ArrowRight })]
    );
}

#[test]
fn lock_toggle_twice_restores_state() {
    let mut lock = LockMachine::new(4, 3);
    let mut toggles = 0;
    for round in 0..2 {
        for _ in 0..4 {
            toggles += lock.update(true, round).is_some() as u32;
        }
        for _ in 0..5 {
            lock.update(false, round);
        }
    }
    assert_eq!(toggles, 2);
    assert!(!lock.is_locked());

    for _ in 0..4 {
        lock.update(true, 7);
    }
    assert_eq!(lock.locked_value(), Some(7));
}

#[test]
fn volume_lock_survives_hand_loss() {
    let config = AppConfig {
        volume: VolumeConfig {
            lock_trigger_frames: 2,
            lock_cooldown_frames: 1,
            ..VolumeConfig::default()
        },
        ..AppConfig::default()
    };
    let mut mode = ModeKind::Volume.build(&config).unwrap();
    let t0 = Instant::now();

    let mut events = mode.step(Some(&HandPose::pointing().with_span(0.2).to_frame()), t0);
    let peace = HandPose::peace().to_frame();
    events.extend(mode.step(Some(&peace), t0));
    events.extend(mode.step(Some(&peace), t0));
    events.extend(mode.step(None, t0));
    events.extend(mode.step(Some(&HandPose::thumbs_up().to_frame()), t0));

    let levels = count(&events, |e| matches!(e, ActionEvent::SetVolumeLevel { .. }));
    assert_eq!(levels, 1);
}

struct ForeverPinch {
    t0: Instant,
    n: u64,
}

#[async_trait::async_trait]
impl FrameSource for ForeverPinch {
    async fn next_frame(&mut self) -> Result<FrameSample, smart_control_core::CaptureError> {
        tokio::time::sleep(ms(10)).await;
        self.n += 1;
        Ok(FrameSample::new(
            self.t0 + ms(self.n * 50),
            Some(HandPose::pointing().pinching().to_frame()),
        ))
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_releases_drag() {
    let (tx, rx) = watch::channel(false);
    let mode = ModeKind::Mouse.build(&AppConfig::default()).unwrap();
    let mut source = ForeverPinch {
        t0: Instant::now(),
        n: 0,
    };
    let mut recorder = RecordingDispatcher::new();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(ms(200)).await;
        tx.send(true).ok();
        tx
    });

    let summary = run_mode(mode, &mut source, &mut recorder, rx).await;
    let _tx = canceller.await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    assert!(summary.frames >= 5);
    let events = recorder.into_events();
    assert_eq!(
        events.last(),
        Some(&ActionEvent::MouseUp {
            button: MouseButton::Left
        })
    );
    let downs = count(&events, |e| matches!(e, ActionEvent::MouseDown { .. }));
    assert_eq!(downs, 1);
}

#[tokio::test]
async fn dropped_cancel_sender_stops_the_loop() {
    let (tx, rx) = watch::channel(false);
    drop(tx);
    let mut source = ScriptedSource::new(Vec::new());
    let mut recorder = RecordingDispatcher::new();

    let summary = run(
        ModeKind::Volume,
        &AppConfig::default(),
        &mut source,
        &mut recorder,
        rx,
    )
    .await
    .unwrap();
    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    assert!(recorder.events().is_empty());
}
