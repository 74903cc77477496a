//! Error types for the gesture engine.

use smart_control_config::ConfigError;

/// Malformed landmark input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongPointCount { expected: usize, actual: usize },
}

/// The frame source can no longer produce frames.
///
/// The runner treats every variant as the end of the loop, never as a panic:
/// it releases held buttons and reports a normal termination.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Frame source exhausted")]
    Exhausted,

    #[error("Frame source closed by user")]
    Closed,

    #[error("Frame capture failed: {0}")]
    Failed(String),
}

/// Errors raised before a mode loop starts.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, RunError>;
