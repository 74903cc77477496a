//! Configuration model, loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SMART_CONTROL_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Upper bound for every duration setting, in seconds
pub const MAX_SECONDS: f64 = 3600.0;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub pointer: PointerConfig,
    pub navigation: NavigationConfig,
    pub volume: VolumeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Pointer (mouse) mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointerConfig {
    /// Fingertip distance below which a pinch is active (normalized units)
    pub pinch_threshold: f32,
    /// Minimum seconds between two clicks of the same button
    pub click_debounce: f64,
    /// Minimum seconds between two double clicks
    pub double_click_debounce: f64,
    /// Seconds a pinch must be held before it becomes a drag
    pub drag_hold_time: f64,
    /// Cursor moving-average window (frames)
    pub smoothing_window: usize,
    /// Pinch label debounce window (frames); 1 uses the raw pinch
    pub pinch_window: usize,
    /// Cursor gain about the frame centre
    pub sensitivity: f32,
    /// Dead zone trimmed from each frame edge before mapping
    pub edge_margin: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.03,
            click_debounce: 0.25,
            double_click_debounce: 0.5,
            drag_hold_time: 0.15,
            smoothing_window: 3,
            pinch_window: 1,
            sensitivity: 1.8,
            edge_margin: 0.1,
        }
    }
}

impl PointerConfig {
    pub fn click_debounce(&self) -> Duration {
        seconds(self.click_debounce)
    }

    pub fn double_click_debounce(&self) -> Duration {
        seconds(self.double_click_debounce)
    }

    pub fn drag_hold_time(&self) -> Duration {
        seconds(self.drag_hold_time)
    }

    pub fn validate(&self) -> Result<()> {
        positive_f32("pointer.pinch_threshold", self.pinch_threshold)?;
        positive_secs("pointer.click_debounce", self.click_debounce)?;
        positive_secs("pointer.double_click_debounce", self.double_click_debounce)?;
        positive_secs("pointer.drag_hold_time", self.drag_hold_time)?;
        nonzero("pointer.smoothing_window", self.smoothing_window)?;
        nonzero("pointer.pinch_window", self.pinch_window)?;
        positive_f32("pointer.sensitivity", self.sensitivity)?;
        if !self.edge_margin.is_finite() || !(0.0..0.5).contains(&self.edge_margin) {
            return Err(ConfigError::invalid(
                "pointer.edge_margin",
                format!("{} is outside [0, 0.5)", self.edge_margin),
            ));
        }
        Ok(())
    }
}

/// Which direction counts as "thumb extended".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbRule {
    /// Mirror the test according to the frame's handedness label; an
    /// unlabeled frame never reports an extended thumb
    #[default]
    Handedness,
    /// Always test as for a right hand
    Right,
    /// Always test as for a left hand
    Left,
}

/// Hold-to-confirm settings shared by the presentation, keyboard and media
/// modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Seconds a stable gesture must be held before it fires
    pub hold_time: f64,
    /// Seconds after a fired action during which nothing fires
    pub cooldown_time: f64,
    /// Consecutive identical labels required for a stable gesture
    pub stabilization_window: usize,
    pub thumb_rule: ThumbRule,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            hold_time: 1.0,
            cooldown_time: 0.8,
            stabilization_window: 5,
            thumb_rule: ThumbRule::Handedness,
        }
    }
}

impl NavigationConfig {
    pub fn hold_time(&self) -> Duration {
        seconds(self.hold_time)
    }

    pub fn cooldown_time(&self) -> Duration {
        seconds(self.cooldown_time)
    }

    pub fn validate(&self) -> Result<()> {
        positive_secs("navigation.hold_time", self.hold_time)?;
        positive_secs("navigation.cooldown_time", self.cooldown_time)?;
        nonzero("navigation.stabilization_window", self.stabilization_window)?;
        Ok(())
    }
}

/// Volume mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VolumeConfig {
    /// Consecutive peace-sign frames needed to toggle the lock
    pub lock_trigger_frames: u32,
    /// Frames after a toggle during which the lock cannot re-trigger
    pub lock_cooldown_frames: u32,
    /// Thumb-index span mapped to level 0.0
    pub min_span: f32,
    /// Thumb-index span mapped to level 1.0
    pub max_span: f32,
    /// Level quantization step
    pub step: f32,
    /// Vertical lift required for index/middle in the peace sign
    pub gesture_margin: f32,
    /// Vertical lift required for the thumb in thumbs-up
    pub thumb_margin: f32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            lock_trigger_frames: 30,
            lock_cooldown_frames: 30,
            min_span: 0.06,
            max_span: 0.34,
            step: 0.05,
            gesture_margin: 0.04,
            thumb_margin: 0.06,
        }
    }
}

impl VolumeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lock_trigger_frames == 0 {
            return Err(ConfigError::invalid(
                "volume.lock_trigger_frames",
                "must be at least 1",
            ));
        }
        if !self.min_span.is_finite() || self.min_span < 0.0 {
            return Err(ConfigError::invalid(
                "volume.min_span",
                format!("{} must be a non-negative number", self.min_span),
            ));
        }
        positive_f32("volume.max_span", self.max_span)?;
        if self.min_span >= self.max_span {
            return Err(ConfigError::invalid(
                "volume.min_span",
                format!("{} must be below max_span {}", self.min_span, self.max_span),
            ));
        }
        if !self.step.is_finite() || self.step <= 0.0 || self.step > 1.0 {
            return Err(ConfigError::invalid(
                "volume.step",
                format!("{} is outside (0, 1]", self.step),
            ));
        }
        positive_f32("volume.gesture_margin", self.gesture_margin)?;
        positive_f32("volume.thumb_margin", self.thumb_margin)?;
        Ok(())
    }
}

impl AppConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.pointer.validate()?;
        self.navigation.validate()?;
        self.volume.validate()?;
        Ok(())
    }

    /// Parse a TOML document; `origin` is only used for error reporting.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load and parse a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents, path)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Platform default location, e.g. `~/.config/smart-control/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "smart-control")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolve and load configuration.
    ///
    /// An explicit path or the [`CONFIG_ENV_VAR`] path must exist. The
    /// platform default path is optional; built-in defaults apply when it is
    /// absent. Returns the config and the file it came from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            return Ok((Self::load_from(&path)?, Some(path)));
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Ok((Self::load_from(&path)?, Some(path))),
            _ => {
                info!("No configuration file found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Render as TOML (used by `check-config`).
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::Render { source })
    }
}

/// Validated values convert exactly; anything else saturates into range.
fn seconds(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(value.min(MAX_SECONDS))
}

fn positive_secs(field: &'static str, value: f64) -> Result<()> {
    let in_range = value > 0.0 && value <= MAX_SECONDS;
    if in_range && Duration::try_from_secs_f64(value).is_ok() {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!(
                "{} must be a positive number of seconds, at most {}",
                value, MAX_SECONDS
            ),
        ))
    }
}

fn positive_f32(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{} must be a positive number", value),
        ))
    }
}

fn nonzero(field: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(ConfigError::invalid(field, "must be at least 1"))
    } else {
        Ok(())
    }
}
