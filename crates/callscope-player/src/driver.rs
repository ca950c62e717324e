//! Timer that feeds playback ticks into a session
//!
//! The driver owns the only timer in the program. It sends one
//! [`Message::Tick`] per interval and stops as soon as the session reports
//! that playback finished or stopped.

use callscope_timeline::{Message, Outcome, Session};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

/// Why the driver returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Playback reached the end of the call
    Finished,
    /// Playback reached the requested stop time
    StopTime,
    /// Playback was paused or never started
    Paused,
}

/// Summary of one driver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSummary {
    /// Ticks delivered to the session
    pub ticks: u64,
    /// Playback position when the driver returned
    pub position: f64,
    /// Why the driver returned
    pub reason: StopReason,
}

/// Drives a session's playback clock from a tokio interval
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    tick: Duration,
    stop_at: Option<f64>,
    report_every: u64,
}

impl PlaybackDriver {
    /// Tick every `tick`; intervals below a millisecond are raised to one
    pub fn new(tick: Duration) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
            stop_at: None,
            report_every: 10,
        }
    }

    /// Pause once playback reaches `time` seconds
    pub const fn with_stop_at(mut self, time: f64) -> Self {
        self.stop_at = Some(time);
        self
    }

    /// Call the observer every `ticks` ticks (at least 1)
    pub fn with_report_every(mut self, ticks: u64) -> Self {
        self.report_every = ticks.max(1);
        self
    }

    /// Tick interval
    pub const fn tick(&self) -> Duration {
        self.tick
    }

    /// Run until playback finishes, is paused, or reaches the stop time
    ///
    /// `observer` sees the session every `report_every` ticks and once more
    /// before returning.
    pub async fn run<F>(&self, session: &mut Session, mut observer: F) -> DriveSummary
    where
        F: FnMut(&Session),
    {
        let mut timer = interval(self.tick);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        timer.tick().await;

        let mut ticks = 0_u64;
        let reason = loop {
            if !session.playback().is_playing() {
                break StopReason::Paused;
            }
            timer.tick().await;
            ticks += 1;

            let outcome = session.update(Message::Tick(self.tick));
            if ticks % self.report_every == 0 {
                observer(session);
            }
            match outcome {
                Outcome::Finished => break StopReason::Finished,
                Outcome::Ignored => break StopReason::Paused,
                Outcome::Updated => {}
            }
            if let Some(stop_at) = self.stop_at
                && session.playback().current_time() >= stop_at
            {
                session.update(Message::Pause);
                break StopReason::StopTime;
            }
        };

        observer(session);
        let position = session.playback().current_time();
        debug!(ticks, position, ?reason, "driver stopped");
        if reason == StopReason::Finished {
            info!(call_id = session.call().id(), "reached end of call");
        }
        DriveSummary {
            ticks,
            position,
            reason,
        }
    }
}
