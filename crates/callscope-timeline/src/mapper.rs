//! Conversion between call time and horizontal position inside the visible window
//!
//! Positions come in two flavours: a *fraction* of the window (0 at the left
//! edge, 1 at the right edge) and a *pixel* offset for a window drawn
//! `width_px` pixels wide. All functions are plain arithmetic; callers clamp
//! results before use.

use serde::{Deserialize, Serialize};

/// The visible slice of the call, `[start, start + width]`, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Left edge in seconds
    pub start: f64,
    /// Visible length in seconds
    pub width: f64,
}

impl TimeWindow {
    /// Create a window
    #[must_use]
    pub const fn new(start: f64, width: f64) -> Self {
        Self { start, width }
    }

    /// Right edge in seconds
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    /// Whether `time` lies in the closed window
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end()
    }

    /// Whether the closed interval `[start, end]` touches the closed window
    #[must_use]
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        start <= self.end() && end >= self.start
    }

    /// Midpoint in seconds
    #[must_use]
    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }
}

/// Fraction of the window at which `time` sits
///
/// Only meaningful for times inside the window; a zero-width window maps
/// everything to 0.
#[must_use]
pub fn position_of(time: f64, window: &TimeWindow) -> f64 {
    if window.width <= 0.0 {
        return 0.0;
    }
    (time - window.start) / window.width
}

/// [`position_of`] for times inside the window, `None` otherwise
#[must_use]
pub fn position_checked(time: f64, window: &TimeWindow) -> Option<f64> {
    window.contains(time).then(|| position_of(time, window))
}

/// Time at `fraction` of the window
#[must_use]
pub fn time_of(fraction: f64, window: &TimeWindow) -> f64 {
    window.start + fraction * window.width
}

/// Pixel offset of `time` in a window drawn `width_px` wide
#[must_use]
pub fn pixel_of(time: f64, window: &TimeWindow, width_px: f64) -> f64 {
    position_of(time, window) * width_px
}

/// Time under pixel `x` of a window drawn `width_px` wide
///
/// A non-positive pixel width maps every pixel to the window start.
#[must_use]
pub fn time_at_pixel(x: f64, window: &TimeWindow, width_px: f64) -> f64 {
    if width_px <= 0.0 {
        return window.start;
    }
    time_of(x / width_px, window)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_position_of_window_edges() {
        let window = TimeWindow::new(100.0, 50.0);

        assert_eq!(position_of(100.0, &window), 0.0);
        assert_eq!(position_of(125.0, &window), 0.5);
        assert_eq!(position_of(150.0, &window), 1.0);
    }

    #[test]
    fn test_position_checked_outside_window() {
        let window = TimeWindow::new(100.0, 50.0);

        assert_eq!(position_checked(200.0, &window), None);
        assert_eq!(position_checked(99.9, &window), None);
        assert_eq!(position_checked(150.0, &window), Some(1.0));
    }

    #[test]
    fn test_zero_width_window_maps_to_origin() {
        let window = TimeWindow::new(0.0, 0.0);
        assert_eq!(position_of(10.0, &window), 0.0);
    }

    #[test]
    fn test_pixel_mapping() {
        let window = TimeWindow::new(0.0, 420.0);

        assert_eq!(pixel_of(210.0, &window, 800.0), 400.0);
        assert_eq!(time_at_pixel(400.0, &window, 800.0), 210.0);
        assert_eq!(time_at_pixel(400.0, &window, 0.0), 0.0);
    }

    #[test]
    fn test_overlaps_is_inclusive() {
        let window = TimeWindow::new(0.0, 420.0);

        assert!(window.overlaps(420.0, 420.0));
        assert!(window.overlaps(-5.0, 0.0));
        assert!(!window.overlaps(420.5, 430.0));
    }

    proptest! {
        #[test]
        fn test_time_position_roundtrip(
            start in 0.0f64..10_000.0,
            width in 0.001f64..10_000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let window = TimeWindow::new(start, width);
            let time = time_of(fraction, &window);
            let back = time_of(position_of(time, &window), &window);
            prop_assert!((back - time).abs() <= 1e-9 * (1.0 + time.abs()));
        }

        #[test]
        fn test_pixel_roundtrip(
            start in 0.0f64..1_000.0,
            width in 1.0f64..1_000.0,
            width_px in 1.0f64..4_000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let window = TimeWindow::new(start, width);
            let time = time_of(fraction, &window);
            let x = pixel_of(time, &window, width_px);
            let back = time_at_pixel(x, &window, width_px);
            prop_assert!((back - time).abs() <= 1e-9 * (1.0 + time.abs()));
        }
    }
}
