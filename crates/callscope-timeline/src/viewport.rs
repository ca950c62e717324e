//! Zoom and pan state of the timeline
//!
//! The viewport keeps `0 <= start` and `start + width <= total` after every
//! mutation. Nothing here fails: out-of-range requests saturate at the
//! boundary.

use crate::mapper::TimeWindow;
use callscope_core::TimelineConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Zoom and pan constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    /// Zoom change per step
    pub step: f64,
    /// Highest zoom level
    pub max_zoom: f64,
    /// Share of the visible width moved by one pan step
    pub pan_step_fraction: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: 0.5,
            max_zoom: 5.0,
            pan_step_fraction: 0.5,
        }
    }
}

impl From<&TimelineConfig> for ZoomSettings {
    fn from(config: &TimelineConfig) -> Self {
        Self {
            step: config.zoom_step,
            max_zoom: config.max_zoom.max(1.0),
            pan_step_fraction: config.pan_step_fraction,
        }
    }
}

/// An in-progress pointer drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Pointer x where the drag began
    pub origin_x: f64,
    /// Window start when the drag began
    pub origin_start: f64,
}

/// Visible window over a call of fixed length
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    total: f64,
    start: f64,
    width: f64,
    zoom: f64,
    settings: ZoomSettings,
    drag: Option<DragAnchor>,
}

impl Viewport {
    /// Full view of a call lasting `total` seconds
    ///
    /// A non-finite or negative length is treated as an empty call.
    #[must_use]
    pub fn new(total: f64, settings: ZoomSettings) -> Self {
        let total = if total.is_finite() && total > 0.0 {
            total
        } else {
            0.0
        };
        Self {
            total,
            start: 0.0,
            width: total,
            zoom: 1.0,
            settings,
            drag: None,
        }
    }

    /// Left edge in seconds
    #[must_use]
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Visible length in seconds
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Current zoom level
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Length of the call
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Zoom and pan constants in use
    #[must_use]
    pub const fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    /// The visible window
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.width)
    }

    /// Largest allowed start for the current width
    fn max_start(&self) -> f64 {
        (self.total - self.width).max(0.0)
    }

    fn clamp_start(&self, start: f64) -> f64 {
        if start.is_nan() {
            return 0.0;
        }
        start.clamp(0.0, self.max_start())
    }

    /// Apply a new zoom level, keeping the old window midpoint centred
    fn rezoom(&mut self, zoom: f64) {
        let center = self.window().center();
        self.zoom = zoom;
        self.width = self.total / zoom;
        self.start = self.clamp_start(center - self.width / 2.0);
    }

    /// Whether another zoom-in step is possible
    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.settings.max_zoom
    }

    /// Whether zooming out would change anything beyond a full-view reset
    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.zoom > 1.0
    }

    /// Zoom in one step; returns `false` when already at the maximum
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        let zoom = (self.zoom + self.settings.step).min(self.settings.max_zoom);
        self.rezoom(zoom);
        debug!(zoom = self.zoom, start = self.start, width = self.width, "zoomed in");
        true
    }

    /// Zoom out one step, or reset to the full view at zoom 1
    pub fn zoom_out(&mut self) {
        if self.can_zoom_out() {
            let zoom = (self.zoom - self.settings.step).max(1.0);
            self.rezoom(zoom);
        } else {
            self.reset();
        }
        debug!(zoom = self.zoom, start = self.start, width = self.width, "zoomed out");
    }

    /// Show the whole call
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.width = self.total;
        self.start = 0.0;
        self.drag = None;
    }

    /// Move the window by `delta` seconds, saturating at both ends
    pub fn pan_by(&mut self, delta: f64) {
        self.start = self.clamp_start(self.start + delta);
    }

    /// Whether a left pan would move the window
    #[must_use]
    pub fn can_pan_left(&self) -> bool {
        self.start > 0.0
    }

    /// Whether a right pan would move the window
    #[must_use]
    pub fn can_pan_right(&self) -> bool {
        self.start + self.width < self.total
    }

    /// Pan left by one step
    pub fn pan_left(&mut self) {
        self.pan_by(-self.width * self.settings.pan_step_fraction);
    }

    /// Pan right by one step
    pub fn pan_right(&mut self) {
        self.pan_by(self.width * self.settings.pan_step_fraction);
    }

    /// Recentre on `time` if it has left the window
    ///
    /// Returns whether the window moved.
    pub fn follow(&mut self, time: f64) -> bool {
        if self.window().contains(time) {
            return false;
        }
        let previous = self.start;
        self.start = self.clamp_start(time - self.width / 2.0);
        self.start != previous
    }

    /// Dragging is only meaningful while zoomed in
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.zoom > 1.0
    }

    /// The active drag, if any
    #[must_use]
    pub const fn drag(&self) -> Option<&DragAnchor> {
        self.drag.as_ref()
    }

    /// Start a drag at pointer `x`; ignored at full view
    pub fn begin_drag(&mut self, x: f64) -> bool {
        if !self.is_draggable() {
            return false;
        }
        self.drag = Some(DragAnchor {
            origin_x: x,
            origin_start: self.start,
        });
        true
    }

    /// Move an active drag to pointer `x` over a timeline `width_px` wide
    ///
    /// Dragging right reveals earlier time. Without an active drag or with a
    /// non-positive pixel width this does nothing.
    pub fn drag_to(&mut self, x: f64, width_px: f64) {
        let Some(anchor) = self.drag else {
            return;
        };
        if width_px <= 0.0 {
            return;
        }
        let delta_time = (x - anchor.origin_x) / width_px * self.width;
        self.start = self.clamp_start(anchor.origin_start - delta_time);
    }

    /// Finish the active drag
    pub fn end_drag(&mut self) {
        self.drag = None;
    }
}
