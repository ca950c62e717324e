//! Configuration management for callscope

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, followed by `__SECTION__KEY`
pub const ENV_PREFIX: &str = "CALLSCOPE";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Timeline viewport and overlay configuration
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Playback clock configuration
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Call data source configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timeline viewport and overlay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Highest zoom level
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Zoom change per zoom in/out step
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Share of the visible width moved by one pan step
    #[serde(default = "default_pan_step_fraction")]
    pub pan_step_fraction: f64,

    /// Segments narrower than this share of the window are hidden
    #[serde(default = "default_min_visible_fraction")]
    pub min_visible_fraction: f64,

    /// Apply sliver suppression to the silence lane
    #[serde(default = "default_suppress_silence_slivers")]
    pub suppress_silence_slivers: bool,

    /// Apply sliver suppression to the speaker lanes
    #[serde(default)]
    pub suppress_speaker_slivers: bool,

    /// Number of ruler labels
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

/// Playback clock configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Interval between playback ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Speed at load
    #[serde(default = "default_speed")]
    pub default_speed: f64,

    /// Seconds moved by skip forward/backward
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    /// Speeds offered to the user
    #[serde(default = "default_speed_options")]
    pub speed_options: Vec<f64>,

    /// Volume at load (0-100)
    #[serde(default = "default_volume")]
    pub volume: u8,
}

/// Call data source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of `<call_id>.json` records; the built-in sample is used when unset
    #[serde(default)]
    pub calls_dir: Option<PathBuf>,

    /// Call opened when none is named
    #[serde(default = "default_call")]
    pub default_call: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
const fn default_max_zoom() -> f64 {
    5.0
}

const fn default_zoom_step() -> f64 {
    0.5
}

const fn default_pan_step_fraction() -> f64 {
    0.5
}

const fn default_min_visible_fraction() -> f64 {
    0.005
}

const fn default_suppress_silence_slivers() -> bool {
    true
}

const fn default_tick_count() -> usize {
    6
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_speed() -> f64 {
    1.0
}

const fn default_skip_seconds() -> f64 {
    10.0
}

fn default_speed_options() -> Vec<f64> {
    vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]
}

const fn default_volume() -> u8 {
    75
}

fn default_call() -> String {
    "sample".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            pan_step_fraction: default_pan_step_fraction(),
            min_visible_fraction: default_min_visible_fraction(),
            suppress_silence_slivers: default_suppress_silence_slivers(),
            suppress_speaker_slivers: false,
            tick_count: default_tick_count(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            default_speed: default_speed(),
            skip_seconds: default_skip_seconds(),
            speed_options: default_speed_options(),
            volume: default_volume(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            calls_dir: None,
            default_call: default_call(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl PlaybackConfig {
    /// Tick interval as a duration
    #[must_use]
    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Config {
    /// Load configuration from an optional `callscope.toml` and `CALLSCOPE__*` variables
    ///
    /// Nested keys use a double underscore, e.g. `CALLSCOPE__TIMELINE__MAX_ZOOM=8`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_with(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(environment: config::Environment) -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("callscope").required(false))
            .add_source(environment)
            .build()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::Error::configuration(format!("failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::configuration(format!("failed to serialize: {e}")))
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error;

        let timeline = &self.timeline;
        if !timeline.max_zoom.is_finite() || timeline.max_zoom < 1.0 {
            return Err(Error::validation("timeline.max_zoom", "must be at least 1"));
        }
        if !is_positive(timeline.zoom_step) {
            return Err(Error::validation("timeline.zoom_step", "must be positive"));
        }
        for (field, value) in [
            ("timeline.pan_step_fraction", timeline.pan_step_fraction),
            ("timeline.min_visible_fraction", timeline.min_visible_fraction),
        ] {
            if !is_positive(value) || value > 1.0 {
                return Err(Error::validation(field, "must be in (0, 1]"));
            }
        }
        if timeline.tick_count < 2 {
            return Err(Error::validation("timeline.tick_count", "must be at least 2"));
        }

        let playback = &self.playback;
        if playback.tick_interval_ms == 0 {
            return Err(Error::validation(
                "playback.tick_interval_ms",
                "must be greater than 0",
            ));
        }
        if !is_positive(playback.default_speed) {
            return Err(Error::validation("playback.default_speed", "must be positive"));
        }
        if !is_positive(playback.skip_seconds) {
            return Err(Error::validation("playback.skip_seconds", "must be positive"));
        }
        if playback.speed_options.iter().any(|speed| !is_positive(*speed)) {
            return Err(Error::validation(
                "playback.speed_options",
                "every speed must be positive",
            ));
        }
        if playback.volume > 100 {
            return Err(Error::validation("playback.volume", "must be at most 100"));
        }

        if !crate::utils::validate_call_id(&self.data.default_call) {
            return Err(Error::validation("data.default_call", "not a valid call id"));
        }

        Ok(())
    }
}
