//! Mode runner
//!
//! Drives one [`ControlMode`] session: pull a frame, run the pipeline,
//! dispatch the resulting events, repeat until cancelled or the frame source
//! ends. Whatever ends the loop, the mode's shutdown hook runs before the
//! runner returns, so a held button never outlives the session.

use std::collections::VecDeque;
use std::time::Instant;

use async_trait::async_trait;
use smart_control_config::AppConfig;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::dispatch::ActionDispatcher;
use crate::error::{CaptureError, Result};
use crate::landmark::LandmarkFrame;
use crate::modes::{ControlMode, ModeKind};

/// One detection cycle from the frame source.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    pub captured_at: Instant,
    /// `None` when no hand was detected
    pub hand: Option<LandmarkFrame>,
}

impl FrameSample {
    pub fn new(captured_at: Instant, hand: Option<LandmarkFrame>) -> Self {
        Self { captured_at, hand }
    }
}

/// Producer of landmark frames (camera pipeline, replay file, simulator).
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> std::result::Result<FrameSample, CaptureError>;
}

/// Why a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    CaptureEnded,
    CaptureFailed(String),
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: ModeKind,
    pub frames: u64,
    pub hand_frames: u64,
    pub events: u64,
    pub stop_reason: StopReason,
}

enum Wake {
    Signal,
    SenderGone,
    Frame(std::result::Result<FrameSample, CaptureError>),
}

/// Validate the mode's configuration, then run it to completion.
///
/// Configuration errors are returned before any frame is read.
pub async fn run<S, D>(
    kind: ModeKind,
    config: &AppConfig,
    source: &mut S,
    dispatcher: &mut D,
    cancel: watch::Receiver<bool>,
) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    D: ActionDispatcher + ?Sized,
{
    let mode = kind.build(config)?;
    Ok(run_mode(mode, source, dispatcher, cancel).await)
}

/// Run an already built mode session until cancellation or the end of the
/// frame stream. `true` on the cancel channel (or dropping its sender) stops
/// the loop.
pub async fn run_mode<S, D>(
    mut mode: Box<dyn ControlMode>,
    source: &mut S,
    dispatcher: &mut D,
    mut cancel: watch::Receiver<bool>,
) -> RunSummary
where
    S: FrameSource + ?Sized,
    D: ActionDispatcher + ?Sized,
{
    let kind = mode.kind();
    info!("Starting {} mode", kind);

    let mut frames = 0u64;
    let mut hand_frames = 0u64;
    let mut events = 0u64;

    let stop_reason = loop {
        if *cancel.borrow() {
            break StopReason::Cancelled;
        }

        let wake = tokio::select! {
            biased;
            changed = cancel.changed() => match changed {
                Ok(()) => Wake::Signal,
                Err(_) => Wake::SenderGone,
            },
            frame = source.next_frame() => Wake::Frame(frame),
        };

        let sample = match wake {
            Wake::Signal => continue,
            Wake::SenderGone => break StopReason::Cancelled,
            Wake::Frame(Ok(sample)) => sample,
            Wake::Frame(Err(CaptureError::Exhausted)) => break StopReason::CaptureEnded,
            Wake::Frame(Err(CaptureError::Closed)) => break StopReason::Cancelled,
            Wake::Frame(Err(CaptureError::Failed(reason))) => {
                warn!("Frame capture failed: {}", reason);
                break StopReason::CaptureFailed(reason);
            }
        };

        frames += 1;
        if sample.hand.is_some() {
            hand_frames += 1;
        }

        for event in mode.step(sample.hand.as_ref(), sample.captured_at) {
            debug!("Dispatch: {}", event);
            dispatcher.dispatch(&event);
            events += 1;
        }
    };

    let mut released = Vec::new();
    mode.shutdown(&mut released);
    for event in &released {
        warn!("Safety release on {} mode stop: {}", kind, event);
        dispatcher.dispatch(event);
        events += 1;
    }

    info!(
        "Stopped {} mode ({:?}) after {} frames, {} events",
        kind, stop_reason, frames, events
    );

    RunSummary {
        mode: kind,
        frames,
        hand_frames,
        events,
        stop_reason,
    }
}

/// In-memory frame source, mainly for tests and replays that are already
/// parsed.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    samples: VecDeque<FrameSample>,
    failure: Option<String>,
}

impl ScriptedSource {
    pub fn new(samples: impl IntoIterator<Item = FrameSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            failure: None,
        }
    }

    /// End with a capture failure instead of exhaustion
    pub fn failing_with(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    async fn next_frame(&mut self) -> std::result::Result<FrameSample, CaptureError> {
        match self.samples.pop_front() {
            Some(sample) => Ok(sample),
            None => match self.failure.take() {
                Some(reason) => Err(CaptureError::Failed(reason)),
                None => Err(CaptureError::Exhausted),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionEvent, MouseButton};
    use crate::dispatch::RecordingDispatcher;
    use crate::error::RunError;
    use crate::sim::HandPose;
    use std::time::Duration;

    fn pinch_samples(t0: Instant, count: u64) -> Vec<FrameSample> {
        let frame = HandPose::pointing().pinching().to_frame();
        (0..count)
            .map(|i| FrameSample::new(t0 + Duration::from_millis(i * 50), Some(frame.clone())))
            .collect()
    }

    #[tokio::test]
    async fn test_exhausted_source_releases_drag() {
        let (_tx, rx) = watch::channel(false);
        let mut source = ScriptedSource::new(pinch_samples(Instant::now(), 6));
        let mut recorder = RecordingDispatcher::new();

        let summary = run(ModeKind::Mouse, &AppConfig::default(), &mut source, &mut recorder, rx)
            .await
            .unwrap();

        assert_eq!(summary.stop_reason, StopReason::CaptureEnded);
        assert_eq!(summary.frames, 6);
        let edges: Vec<_> = recorder
            .events()
            .iter()
            .filter(|e| e.is_button_edge())
            .copied()
            .collect();
        assert_eq!(
            edges,
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

    #[tokio::test]
    async fn test_capture_failure_is_a_normal_stop() {
        let (_tx, rx) = watch::channel(false);
        let mut source = ScriptedSource::new(pinch_samples(Instant::now(), 2)).failing_with("camera unplugged");
        let mut recorder = RecordingDispatcher::new();

        let summary = run(ModeKind::Mouse, &AppConfig::default(), &mut source, &mut recorder, rx)
            .await
            .unwrap();
        assert_eq!(
            summary.stop_reason,
            StopReason::CaptureFailed("camera unplugged".to_string())
        );
        assert_eq!(summary.frames, 2);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let mut source = ScriptedSource::new(pinch_samples(Instant::now(), 4));
        let mut recorder = RecordingDispatcher::new();

        let summary = run(ModeKind::Mouse, &AppConfig::default(), &mut source, &mut recorder, rx)
            .await
            .unwrap();
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
        assert_eq!(summary.frames, 0);
        assert_eq!(source.remaining(), 4);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_loop() {
        let (_tx, rx) = watch::channel(false);
        let mut config = AppConfig::default();
        config.navigation.cooldown_time = 0.0;
        let mut source = ScriptedSource::new(pinch_samples(Instant::now(), 4));
        let mut recorder = RecordingDispatcher::new();

        let err = run(ModeKind::Keyboard, &config, &mut source, &mut recorder, rx)
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
        assert_eq!(source.remaining(), 4);
    }
}
