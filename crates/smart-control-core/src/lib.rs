//! smart-control-core: gesture interpretation and event-dispatch engine
//!
//! Turns a per-frame stream of 21-point hand landmarks into stable, rate
//! limited control actions:
//! - Geometric features (finger extension, fingertip distances)
//! - Pure gesture classification per mode
//! - Temporal stabilization (cursor smoothing, label debouncing)
//! - Drag, hold-to-confirm and lock state machines
//! - Control modes and an async runner with explicit cancellation
//!
//! Hand detection and OS actuation live outside this crate, behind
//! [`FrameSource`] and [`ActionDispatcher`].

pub mod action;
pub mod dispatch;
pub mod error;
pub mod features;
pub mod gesture;
pub mod landmark;
pub mod machines;
pub mod modes;
pub mod runner;
pub mod sim;
pub mod stabilizer;

// Re-export commonly used types
pub use action::{ActionEvent, Key, MouseButton};
pub use dispatch::{ActionDispatcher, RecordingDispatcher};
pub use error::{CaptureError, FrameError, Result, RunError};
pub use features::{FeatureExtractor, FeatureVector, Finger, FingerStates};
pub use landmark::{HandLandmark, Handedness, Landmark, LandmarkFrame, LANDMARK_COUNT};
pub use modes::{ControlMode, ModeKind};
pub use runner::{run, run_mode, FrameSample, FrameSource, RunSummary, ScriptedSource, StopReason};
pub use sim::{HandPose, HandSimulator, PinchPair, SimInput};
pub use stabilizer::{LabelDebouncer, PositionSmoother, VoteStrategy};
