//! Configuration for the smart-control gesture engine.
//!
//! Every control mode reads its thresholds and timing windows from a single
//! [`AppConfig`] document:
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [pointer]
//! pinch_threshold = 0.03
//! click_debounce = 0.25
//! drag_hold_time = 0.15
//!
//! [navigation]
//! hold_time = 1.0
//! cooldown_time = 0.8
//! stabilization_window = 5
//! thumb_rule = "handedness"
//!
//! [volume]
//! lock_trigger_frames = 30
//! ```
//!
//! All fields have defaults, so a missing file or an empty file is valid.
//! Validation is explicit ([`AppConfig::validate`]) and is expected to run at
//! mode start, before any frame is processed.

pub mod config;
pub mod error;

pub use config::{
    AppConfig, LoggingConfig, NavigationConfig, PointerConfig, ThumbRule, VolumeConfig,
    CONFIG_ENV_VAR, MAX_SECONDS,
};
pub use error::{ConfigError, Result};
