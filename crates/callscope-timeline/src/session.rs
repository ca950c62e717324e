//! Interactive state of one opened call
//!
//! A [`Session`] owns the call, the viewport, the playback clock and the UI
//! flags. [`Session::update`] is the only way to change any of them, so a
//! frontend feeds it [`Message`]s and redraws from [`Session::frame`].

use crate::call::CallTimeline;
use crate::mapper::time_at_pixel;
use crate::overlay::{FrameRequest, OverlayFrame, OverlayPolicy, resolve_frame};
use crate::playback::{Playback, TickOutcome};
use crate::search::{filter_lines, line_at};
use crate::viewport::{Viewport, ZoomSettings};
use callscope_core::{Config, ItemId, TranscriptLine};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Keyboard key relevant to shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Space bar
    Space,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Any printable character
    Char(char),
}

impl Key {
    /// Message bound to this key, if any
    #[must_use]
    pub fn action(self) -> Option<Message> {
        match self {
            Self::Space => Some(Message::TogglePlayback),
            Self::ArrowLeft => Some(Message::SkipBackward),
            Self::ArrowRight => Some(Message::SkipForward),
            Self::Char('f') => Some(Message::ToggleFullscreen),
            Self::Char(_) => None,
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            " " | "space" => Ok(Self::Space),
            "left" | "ArrowLeft" => Ok(Self::ArrowLeft),
            "right" | "ArrowRight" => Ok(Self::ArrowRight),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c)),
                    _ => Err(format!("unknown key '{other}'")),
                }
            }
        }
    }
}

/// Everything a frontend can ask the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Start playback
    Play,
    /// Stop playback
    Pause,
    /// Play or pause
    TogglePlayback,
    /// Timer fired after this interval
    Tick(Duration),
    /// Jump to a time in seconds
    SeekTo(f64),
    /// Jump forward by the skip distance
    SkipForward,
    /// Jump backward by the skip distance
    SkipBackward,
    /// Change playback speed
    SetSpeed(f64),
    /// Change volume (0-100)
    SetVolume(u8),
    /// Zoom in one step
    ZoomIn,
    /// Zoom out one step
    ZoomOut,
    /// Pan left one step
    PanLeft,
    /// Pan right one step
    PanRight,
    /// Pan by a number of seconds
    PanBy(f64),
    /// Pointer pressed on the timeline
    DragStart {
        /// Pointer x in pixels
        x: f64,
    },
    /// Pointer moved while pressed
    DragMove {
        /// Pointer x in pixels
        x: f64,
        /// Drawn width of the timeline
        width_px: f64,
    },
    /// Pointer released or left the timeline
    DragEnd,
    /// Click on the timeline
    TimelineClick {
        /// Pointer x in pixels
        x: f64,
        /// Drawn width of the timeline
        width_px: f64,
    },
    /// Jump to the start of a segment
    SelectSegment(ItemId),
    /// Jump to a marker
    SelectMarker(ItemId),
    /// Filter the transcript
    Search(String),
    /// Enter or leave fullscreen
    ToggleFullscreen,
    /// Keyboard shortcut
    Shortcut(Key),
}

impl Message {
    /// Whether the message can move the playhead
    #[must_use]
    pub const fn moves_playhead(&self) -> bool {
        matches!(
            self,
            Self::Tick(_)
                | Self::SeekTo(_)
                | Self::SkipForward
                | Self::SkipBackward
                | Self::TimelineClick { .. }
                | Self::SelectSegment(_)
                | Self::SelectMarker(_)
        )
    }
}

/// Result of applying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed
    Updated,
    /// The message did not apply and nothing changed
    Ignored,
    /// Playback reached the end of the call; stop the timer
    Finished,
}

/// Interactive state of one call
#[derive(Debug, Clone)]
pub struct Session {
    call: CallTimeline,
    viewport: Viewport,
    playback: Playback,
    search_query: String,
    fullscreen: bool,
    policy: OverlayPolicy,
    tick_count: usize,
}

impl Session {
    /// Open `call` with the given configuration
    #[must_use]
    pub fn new(call: CallTimeline, config: &Config) -> Self {
        let total = call.total();
        Self {
            viewport: Viewport::new(total, ZoomSettings::from(&config.timeline)),
            playback: Playback::new(total, &config.playback),
            policy: OverlayPolicy::from(&config.timeline),
            tick_count: config.timeline.tick_count,
            search_query: String::new(),
            fullscreen: false,
            call,
        }
    }

    /// The opened call
    #[must_use]
    pub const fn call(&self) -> &CallTimeline {
        &self.call
    }

    /// Zoom and pan state
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Playback clock
    #[must_use]
    pub const fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Current transcript filter
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether fullscreen is on
    #[must_use]
    pub const fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Apply one message
    pub fn update(&mut self, message: Message) -> Outcome {
        let follow = message.moves_playhead();
        let outcome = self.apply(message);
        if follow && outcome != Outcome::Ignored {
            let time = self.playback.current_time();
            if self.viewport.follow(time) {
                debug!(time, start = self.viewport.start(), "window follows playhead");
            }
        }
        outcome
    }

    fn apply(&mut self, message: Message) -> Outcome {
        match message {
            Message::Play => self.playback.play(),
            Message::Pause => self.playback.pause(),
            Message::TogglePlayback => self.playback.toggle(),
            Message::Tick(interval) => {
                return match self.playback.tick(interval) {
                    TickOutcome::Idle => Outcome::Ignored,
                    TickOutcome::Advanced => Outcome::Updated,
                    TickOutcome::Finished => Outcome::Finished,
                };
            }
            Message::SeekTo(time) => self.playback.seek_to(time),
            Message::SkipForward => self.playback.skip_forward(),
            Message::SkipBackward => self.playback.skip_backward(),
            Message::SetSpeed(speed) => {
                if !self.playback.set_speed(speed) {
                    return Outcome::Ignored;
                }
            }
            Message::SetVolume(volume) => self.playback.set_volume(volume),
            Message::ZoomIn => {
                if !self.viewport.zoom_in() {
                    return Outcome::Ignored;
                }
            }
            Message::ZoomOut => self.viewport.zoom_out(),
            Message::PanLeft => self.viewport.pan_left(),
            Message::PanRight => self.viewport.pan_right(),
            Message::PanBy(delta) => self.viewport.pan_by(delta),
            Message::DragStart { x } => {
                if !self.viewport.begin_drag(x) {
                    return Outcome::Ignored;
                }
            }
            Message::DragMove { x, width_px } => {
                if self.viewport.drag().is_none() {
                    return Outcome::Ignored;
                }
                self.viewport.drag_to(x, width_px);
            }
            Message::DragEnd => self.viewport.end_drag(),
            Message::TimelineClick { x, width_px } => {
                let time = time_at_pixel(x, &self.viewport.window(), width_px);
                self.playback.seek_to(time);
            }
            Message::SelectSegment(id) => {
                let Some(segment) = self.call.segment(id) else {
                    warn!(id, "unknown segment");
                    return Outcome::Ignored;
                };
                self.playback.seek_to(segment.start);
            }
            Message::SelectMarker(id) => {
                let Some(marker) = self.call.marker(id) else {
                    warn!(id, "unknown marker");
                    return Outcome::Ignored;
                };
                self.playback.seek_to(marker.timestamp);
            }
            Message::Search(query) => self.search_query = query,
            Message::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            Message::Shortcut(key) => {
                return match key.action() {
                    Some(action) => self.update(action),
                    None => Outcome::Ignored,
                };
            }
        }
        Outcome::Updated
    }

    /// Everything needed to draw the timeline now
    #[must_use]
    pub fn frame(&self) -> OverlayFrame<'_> {
        let request = FrameRequest {
            window: self.viewport.window(),
            playhead: self.playback.current_time(),
            policy: self.policy,
            tick_count: self.tick_count,
        };
        resolve_frame(self.call.segments(), self.call.markers(), &request)
    }

    /// Transcript lines matching the search query
    #[must_use]
    pub fn visible_transcript(&self) -> Vec<&TranscriptLine> {
        filter_lines(self.call.lines(), &self.search_query)
    }

    /// Line being spoken at the playhead
    #[must_use]
    pub fn current_line(&self) -> Option<&TranscriptLine> {
        line_at(self.call.lines(), self.playback.current_time())
    }
}
