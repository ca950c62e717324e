//! Playback clock
//!
//! `Stopped -> Playing` on play, back to stopped on pause or when the clock
//! reaches the end of the call. The clock is advanced by ticks rather than
//! wall time, so it can be driven by a timer or by tests.

use callscope_core::{PlaybackConfig, utils::clamp_time};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

// Absorbs drift from summing fractional ticks.
const END_TOLERANCE: f64 = 1e-6;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// Not playing; nothing changed
    Idle,
    /// Time moved forward
    Advanced,
    /// Time reached the end and playback stopped
    Finished,
}

/// Playback position and transport state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playback {
    total: f64,
    current_time: f64,
    playing: bool,
    speed: f64,
    volume: u8,
    skip_seconds: f64,
}

impl Playback {
    /// Stopped at zero over a call lasting `total` seconds
    #[must_use]
    pub fn new(total: f64, config: &PlaybackConfig) -> Self {
        let speed = if config.default_speed.is_finite() && config.default_speed > 0.0 {
            config.default_speed
        } else {
            1.0
        };
        Self {
            total: total.max(0.0),
            current_time: 0.0,
            playing: false,
            speed,
            volume: config.volume.min(100),
            skip_seconds: config.skip_seconds,
        }
    }

    /// Current position in seconds
    #[must_use]
    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Whether the clock is running
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Playback rate multiplier
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Volume, 0-100
    #[must_use]
    pub const fn volume(&self) -> u8 {
        self.volume
    }

    /// Length of the call
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Whether the clock sits at the end of the call
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.current_time >= self.total
    }

    /// Start the clock
    ///
    /// Playing from the end does not rewind; the next tick finishes.
    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            debug!(time = self.current_time, speed = self.speed, "playback started");
        }
    }

    /// Stop the clock
    pub fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            debug!(time = self.current_time, "playback paused");
        }
    }

    /// Play if stopped, pause if playing
    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `time`, clamped to the call
    pub fn seek_to(&mut self, time: f64) {
        self.current_time = clamp_time(time, self.total);
        debug!(requested = time, time = self.current_time, "seek");
    }

    /// Jump forward by the skip distance
    pub fn skip_forward(&mut self) {
        self.seek_to(self.current_time + self.skip_seconds);
    }

    /// Jump backward by the skip distance
    pub fn skip_backward(&mut self) {
        self.seek_to(self.current_time - self.skip_seconds);
    }

    /// Change the rate; non-positive or non-finite rates are ignored
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            warn!(speed, "ignoring invalid playback speed");
            return false;
        }
        self.speed = speed;
        true
    }

    /// Change the volume, capped at 100
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    /// Advance the clock by `interval` scaled by speed
    pub fn tick(&mut self, interval: Duration) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }
        let next = self.current_time + interval.as_secs_f64() * self.speed;
        if next >= self.total - END_TOLERANCE {
            self.current_time = self.total;
            self.playing = false;
            info!(time = self.current_time, "playback finished");
            return TickOutcome::Finished;
        }
        self.current_time = next;
        TickOutcome::Advanced
    }
}
